use std::env;

use crate::error::{Error, Result};

/// Environment variable consulted when no explicit key is given.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Resolve the API key: an explicit argument wins, then the
    /// `GEMINI_API_KEY` environment variable. Empty values count as absent.
    pub fn resolve(explicit_key: Option<String>) -> Result<Self> {
        Self::resolve_with(explicit_key, env::var(API_KEY_ENV).ok())
    }

    fn resolve_with(explicit_key: Option<String>, env_key: Option<String>) -> Result<Self> {
        let api_key = explicit_key
            .filter(|k| !k.is_empty())
            .or(env_key.filter(|k| !k.is_empty()))
            .ok_or(Error::MissingApiKey)?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
