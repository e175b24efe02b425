use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub const ENV_URL: &str = "SUPABASE_URL";
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_ACCESS_TOKEN: &str = "SUPABASE_ACCESS_TOKEN";
pub const ENV_TIMEOUT: &str = "RENTAL_SCOUT_TIMEOUT_SECS";

/// Connection settings for the hosted backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Project URL, without the `/rest/v1` suffix
    pub url: String,
    /// Public key sent as `apikey`
    pub anon_key: String,
    /// Signed-in user's token, used as the bearer instead of the anon key
    pub access_token: Option<String>,
    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl BackendConfig {
    /// Read settings from the environment, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL)
            .filter(|v| !v.trim().is_empty())
            .with_context(|| format!("Missing environment variable {}", ENV_URL))?;
        let anon_key = lookup(ENV_ANON_KEY)
            .filter(|v| !v.trim().is_empty())
            .with_context(|| format!("Missing environment variable {}", ENV_ANON_KEY))?;

        let timeout_secs = match lookup(ENV_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_TIMEOUT, raw))?,
            None => Self::default().timeout_secs,
        };

        Ok(Self {
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
            access_token: lookup(ENV_ACCESS_TOKEN).filter(|v| !v.trim().is_empty()),
            timeout_secs,
        })
    }

    /// Token for the `Authorization` header
    pub fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}
