//! Password resolution for the mail account.
//!
//! First non-empty source wins: `passwordInsecure`, then `passwordFile`
//! (e.g. `/run/secrets/imap`), then `passwordEnvVar`.

use secrecy::SecretString;
use std::fs;

use crate::config::ImapAuth;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No password configured (set passwordEnvVar, passwordFile or passwordInsecure)")]
    NoSource,

    #[error("Cannot read password file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Password variable '{name}' is not set")]
    EnvVarMissing { name: String },

    #[error("Password variable '{name}' is not valid UTF-8")]
    EnvVarInvalid { name: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolves a secret from the first non-empty source. Values read from files
/// and environment variables are trimmed.
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = non_empty(direct) {
        return Ok(SecretString::from(value.to_string()));
    }

    if let Some(path) = non_empty(file_path) {
        let expanded = expand_home(path);
        return fs::read_to_string(&expanded)
            .map(|content| SecretString::from(content.trim().to_string()))
            .map_err(|source| SecretError::FileRead {
                path: expanded,
                source,
            });
    }

    if let Some(name) = non_empty(env_var) {
        return match std::env::var(name) {
            Ok(value) => Ok(SecretString::from(value.trim().to_string())),
            Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarMissing {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarInvalid {
                name: name.to_string(),
            }),
        };
    }

    Err(SecretError::NoSource)
}

/// Resolves the IMAP password configured in `auth`.
pub fn resolve_password(auth: &ImapAuth) -> Result<SecretString> {
    if auth.password_insecure.is_some() {
        log::warn!(
            "Using a direct password value (passwordInsecure) is not recommended. \
             Consider passwordEnvVar or passwordFile instead."
        );
    }
    resolve_secret(
        auth.password_insecure.as_deref(),
        auth.password_file.as_deref(),
        auth.password_env_var.as_deref(),
    )
}

/// Expands a leading `~` or `~/` to the user's home directory.
///
/// `~user/path` is not supported.
fn expand_home(path: &str) -> String {
    if path != "~" && !path.starts_with("~/") {
        return path.to_string();
    }
    match dirs::home_dir() {
        Some(home) => path.replacen('~', &home.to_string_lossy(), 1),
        None => path.to_string(),
    }
}
