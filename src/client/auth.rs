//! Credential resolution for the JFrog Platform
//!
//! Resolves the platform URL and access token from, in order of precedence:
//! explicit CLI flags, the `JFROG_URL` / `JFROG_ACCESS_TOKEN` environment
//! variables, and the persistent config file.

use crate::config::Config;

/// Environment variable holding the JFrog Platform URL
pub const URL_ENV_VAR: &str = "JFROG_URL";

/// Environment variable holding the access token
pub const ACCESS_TOKEN_ENV_VAR: &str = "JFROG_ACCESS_TOKEN";

/// Resolved credentials for the Distribution API
#[derive(Debug, Clone)]
pub struct Credentials {
    pub url: String,
    pub access_token: String,
}

impl Credentials {
    /// Resolve credentials from flags, environment, and config.
    ///
    /// Returns `None` when no URL can be found anywhere in the chain. A
    /// missing access token is tolerated (some read-only endpoints accept
    /// anonymous access) but logged as a warning.
    pub fn resolve(
        flag_url: Option<&str>,
        flag_token: Option<&str>,
        config: &Config,
    ) -> Option<Self> {
        let url = flag_url
            .map(str::to_string)
            .or_else(|| std::env::var(URL_ENV_VAR).ok().filter(|v| !v.is_empty()))
            .or_else(|| config.url.clone())?;

        let access_token = flag_token
            .map(str::to_string)
            .or_else(|| {
                std::env::var(ACCESS_TOKEN_ENV_VAR)
                    .ok()
                    .filter(|v| !v.is_empty())
            })
            .or_else(|| config.access_token.clone())
            .unwrap_or_default();

        if access_token.is_empty() {
            tracing::warn!(
                "No access token found in flags, {} or config; API functionality will be affected",
                ACCESS_TOKEN_ENV_VAR
            );
        }

        Some(Self { url, access_token })
    }
}
