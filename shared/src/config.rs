use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiBase;
use crate::retry::RetryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:27606";
/// Upper bound accepted for `user_ids_retry.max_retries`.
pub const MAX_USER_IDS_RETRIES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_ids_retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_ids_retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Malformed(String),

    #[error("invalid api_base_url: {0}")]
    InvalidBaseUrl(String),

    #[error("user_ids_retry.max_retries {0} exceeds maximum of {max}", max = MAX_USER_IDS_RETRIES)]
    TooManyRetries(u32),
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ApiBase::parse(&self.api_base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

        if self.user_ids_retry.max_retries > MAX_USER_IDS_RETRIES {
            return Err(ConfigError::TooManyRetries(
                self.user_ids_retry.max_retries,
            ));
        }

        Ok(())
    }

    pub fn api(&self) -> Result<ApiBase, crate::capabilities::FetchError> {
        ApiBase::parse(&self.api_base_url)
    }
}
