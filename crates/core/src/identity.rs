//! Decoding a bearer credential into the identity it claims.
//!
//! The credential is a JWT: `header.payload.signature`. Only the payload is
//! read. The signature is NOT verified here; every backend API call verifies
//! it, so the decoded identity is only good for choosing what to render.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Credential, Email, EmailError, Role, SubjectId};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// JWTs use the URL-safe alphabet, but older issuers emit standard base64.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Reasons a credential could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not three `.`-separated segments, or the payload segment is empty.
    #[error("credential is not a three-segment token")]
    Structure,

    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not JSON, or misses/mistypes a claim (including unknown roles).
    #[error("payload is not a valid identity: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("payload email is invalid: {0}")]
    Email(#[from] EmailError),

    #[error("payload expiry {0} is out of range")]
    Expiry(i64),
}

/// Claims as they appear on the wire.
#[derive(Deserialize)]
struct Claims {
    #[serde(alias = "sub")]
    id: SubjectId,
    email: String,
    role: Role,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
}

/// The identity a credential claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedIdentity {
    pub id: SubjectId,
    pub email: Email,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl DecodedIdentity {
    /// Whether the credential's expiry is at or before `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Decode the identity carried by `credential`.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the token structure, base64 encoding, JSON
/// payload, email or expiry is invalid.
pub fn decode(credential: &Credential) -> Result<DecodedIdentity, DecodeError> {
    let mut segments = credential.expose().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::Structure);
    };
    if payload.is_empty() {
        return Err(DecodeError::Structure);
    }

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))?;
    let claims: Claims = serde_json::from_slice(&bytes)?;

    Ok(DecodedIdentity {
        id: claims.id,
        email: Email::parse(&claims.email)?,
        role: claims.role,
        expires_at: timestamp(claims.exp)?,
        issued_at: claims.iat.map(timestamp).transpose()?,
    })
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::from_timestamp(secs, 0).ok_or(DecodeError::Expiry(secs))
}

/// Build an unsigned token around `payload`, for tests and local tooling.
///
/// The header and signature segments are fixed placeholders; nothing here
/// verifies them.
#[must_use]
pub fn encode_unsigned(payload: &serde_json::Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let body = engine.encode(payload.to_string());
    format!("{header}.{body}.unsigned")
}
