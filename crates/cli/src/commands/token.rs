//! Credential inspection and guard dry-runs.
//!
//! # Usage
//!
//! ```bash
//! lapak token inspect "$TOKEN" --format yaml
//! lapak token check "$TOKEN" --allow store_admin,super_admin --reject-expired
//! echo "$TOKEN" | lapak token check - --allow customer
//! ```

use std::io::{self, BufRead, Write};

use clap::ValueEnum;
use lapak_core::guard::{
    AuthorizationState, GuardConfig, MemoryCredentialStore, Mounted, Page, RecordingNavigator,
    with_auth,
};
use lapak_core::{Credential, DecodeError, Role, RoleSet, decode};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur in token commands.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Nothing to decode.
    #[error("No token given")]
    Empty,

    /// The credential is not a readable token.
    #[error("Cannot decode token: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Output format for `token inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Resolve the token argument, reading one line from `stdin` for `-`.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the token is blank.
pub fn read_token(arg: &str, mut stdin: impl BufRead) -> Result<String, TokenError> {
    let token = if arg == "-" {
        let mut line = String::new();
        stdin.read_line(&mut line)?;
        line
    } else {
        arg.to_string()
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    Ok(token.to_string())
}

/// Decode a credential and write the claimed identity.
///
/// The signature is never checked; this shows what the token claims, not
/// whether it is genuine.
///
/// # Errors
///
/// Returns an error if the token does not decode or output fails.
pub fn inspect(token: &str, format: OutputFormat, out: &mut impl Write) -> Result<(), TokenError> {
    let credential = Credential::from_stored(token).ok_or(TokenError::Empty)?;
    let identity = decode(&credential)?;

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &identity)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, &identity)?,
    }
    Ok(())
}

/// Options for `token check`.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Allowed roles. Empty means every role.
    pub allow: Vec<Role>,
    pub redirect: String,
    pub reject_expired: bool,
}

/// Stand-in page so the dry-run goes through the same mount as a real one.
struct Preview;

impl Page for Preview {
    type Props = ();
    type Output = &'static str;

    fn render(&self, _props: &()) -> &'static str {
        "page content"
    }
}

/// What a guarded page would do with a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Decision {
    /// The guard has not run on this mount yet.
    Loading,
    /// The page renders.
    Render { role: Role, email: String },
    /// The role's "not authorized" view renders instead.
    NotAuthorized { role: Role, view: String },
    /// Nothing renders; the user is sent elsewhere.
    Redirect { to: String },
}

/// Full dry-run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub allowed: String,
    #[serde(flatten)]
    pub decision: Decision,
    /// Whether the guard removed the stored credential.
    pub credential_cleared: bool,
    pub navigations: Vec<String>,
}

/// Run the page guard against `token` and write the decision as JSON.
///
/// An undecodable token is not an error here: it is reported as the redirect
/// a page would perform.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn check(
    token: &str,
    options: &CheckOptions,
    out: &mut impl Write,
) -> Result<CheckReport, TokenError> {
    let report = dry_run(token, options);
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(report)
}

fn dry_run(token: &str, options: &CheckOptions) -> CheckReport {
    let allowed_roles = if options.allow.is_empty() {
        RoleSet::all()
    } else {
        options.allow.iter().copied().collect()
    };
    let config = GuardConfig::new()
        .allow_set(allowed_roles)
        .redirect_to(options.redirect.clone())
        .reject_expired(options.reject_expired);

    let page = with_auth(Preview, config);
    let mut store = MemoryCredentialStore::with_raw(token);
    let mut navigator = RecordingNavigator::new();

    let mut mount = page.mount();
    mount.resolve(&mut store, &mut navigator);

    let decision = decide(&mount);

    CheckReport {
        allowed: page.guard().config().allowed_roles().to_string(),
        decision,
        credential_cleared: store.was_cleared(),
        navigations: navigator.pushed().to_vec(),
    }
}

/// Read the decision off a mount's state.
fn decide(mount: &Mounted<'_, Preview>) -> Decision {
    match mount.state() {
        AuthorizationState::Loading => Decision::Loading,
        AuthorizationState::Authorized(identity) => {
            tracing::debug!(rendered = ?mount.render(&()), "Guard let the page through");
            Decision::Render {
                role: identity.role,
                email: identity.email.to_string(),
            }
        }
        AuthorizationState::UnauthorizedWithRole { role, view } => Decision::NotAuthorized {
            role: *role,
            view: view.path.clone(),
        },
        AuthorizationState::UnauthorizedNoCredential { redirect } => Decision::Redirect {
            to: redirect.clone(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lapak_core::identity::encode_unsigned;
    use serde_json::json;

    use super::*;

    fn token(role: &str) -> String {
        encode_unsigned(&json!({
            "id": 42,
            "email": "sari@lapak.example",
            "role": role,
            "exp": 4_102_444_800_i64,
        }))
    }

    fn options(allow: &[Role]) -> CheckOptions {
        CheckOptions {
            allow: allow.to_vec(),
            redirect: "/login".to_string(),
            reject_expired: false,
        }
    }

    #[test]
    fn test_read_token_from_arg_and_stdin() {
        assert_eq!(read_token(" abc ", io::empty()).unwrap(), "abc");
        assert_eq!(read_token("-", "xyz\n".as_bytes()).unwrap(), "xyz");
        assert!(matches!(read_token("-", io::empty()), Err(TokenError::Empty)));
    }

    #[test]
    fn test_inspect_json() {
        let mut out = Vec::new();
        inspect(&token("store_admin"), OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["role"], "store_admin");
        assert_eq!(value["email"], "sari@lapak.example");
    }

    #[test]
    fn test_inspect_yaml() {
        let mut out = Vec::new();
        inspect(&token("customer"), OutputFormat::Yaml, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("role: customer"));
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        let mut out = Vec::new();
        assert!(matches!(
            inspect("not-a-token", OutputFormat::Json, &mut out),
            Err(TokenError::Decode(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_check_allowed_role_renders() {
        let report = dry_run(&token("super_admin"), &options(&[Role::SuperAdmin]));
        assert_eq!(
            report.decision,
            Decision::Render {
                role: Role::SuperAdmin,
                email: "sari@lapak.example".to_string(),
            }
        );
        assert!(report.navigations.is_empty());
        assert!(!report.credential_cleared);
    }

    #[test]
    fn test_check_wrong_role_gets_its_view() {
        let report = dry_run(&token("customer"), &options(&[Role::SuperAdmin]));
        assert_eq!(
            report.decision,
            Decision::NotAuthorized {
                role: Role::Customer,
                view: "/not-authorized-customer".to_string(),
            }
        );
        assert!(report.navigations.is_empty());
    }

    #[test]
    fn test_check_garbage_redirects_and_clears() {
        let report = dry_run("a.b", &options(&[]));
        assert_eq!(
            report.decision,
            Decision::Redirect {
                to: "/login".to_string()
            }
        );
        assert!(report.credential_cleared);
        assert_eq!(report.navigations, ["/login"]);
    }

    #[test]
    fn test_unresolved_mount_is_loading() {
        let page = with_auth(Preview, GuardConfig::new());
        assert_eq!(decide(&page.mount()), Decision::Loading);
    }

    #[test]
    fn test_check_reports_allow_list() {
        let report = dry_run(
            &token("customer"),
            &options(&[Role::StoreAdmin, Role::SuperAdmin]),
        );
        assert_eq!(report.allowed, "store_admin,super_admin");
    }

    #[test]
    fn test_check_writes_json() {
        let mut out = Vec::new();
        check(&token("customer"), &options(&[]), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["result"], "render");
        assert_eq!(value["allowed"], RoleSet::all().to_string());
    }
}
