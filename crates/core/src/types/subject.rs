//! Subject identifier carried in a credential.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The user id a credential was issued for.
///
/// The backend emits numeric ids, but some issuers put them in `sub` as a
/// string; both forms are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSubject", into = "String")]
pub struct SubjectId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSubject {
    Number(i64),
    Text(String),
}

impl SubjectId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<RawSubject> for SubjectId {
    type Error = &'static str;

    fn try_from(raw: RawSubject) -> Result<Self, Self::Error> {
        match raw {
            RawSubject::Number(n) => Ok(Self(n.to_string())),
            RawSubject::Text(s) if s.trim().is_empty() => Err("subject id cannot be empty"),
            RawSubject::Text(s) => Ok(Self(s)),
        }
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_ids() {
        let numeric: SubjectId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric.as_str(), "42");

        let text: SubjectId = serde_json::from_str("\"usr_9f\"").unwrap();
        assert_eq!(text.as_str(), "usr_9f");
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(serde_json::from_str::<SubjectId>("\"  \"").is_err());
        assert!(serde_json::from_str::<SubjectId>("null").is_err());
    }
}
