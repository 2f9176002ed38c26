//! Pipe configuration, sourced from the environment once at construction.

use std::env;

use crate::error::{PipeError, PipeResult};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "AZURE_DEEPSEEK_API_KEY";
/// Environment variable holding the endpoint base URL.
pub const ENV_ENDPOINT: &str = "AZURE_DEEPSEEK_ENDPOINT";
/// Environment variable holding the API version.
pub const ENV_API_VERSION: &str = "AZURE_DEEPSEEK_API_VERSION";

/// Connection settings for the Azure-hosted model endpoint
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Base URL of the Azure AI endpoint, with or without a trailing slash.
    pub endpoint: String,
    /// Value forwarded as the `api-version` query parameter.
    pub api_version: String,
}

impl PipeConfig {
    /// Create a configuration from explicit values.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            api_version: api_version.into(),
        }
    }

    /// Read the configuration from the environment.
    pub fn from_env() -> PipeResult<Self> {
        Ok(Self {
            api_key: require_env(ENV_API_KEY)?,
            endpoint: require_env(ENV_ENDPOINT)?,
            api_version: require_env(ENV_API_VERSION)?,
        })
    }

    /// Check that no required value is empty.
    pub fn validate(&self) -> PipeResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(PipeError::Config("API key must not be empty".to_string()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(PipeError::Config("Endpoint must not be empty".to_string()));
        }
        if self.api_version.trim().is_empty() {
            return Err(PipeError::Config(
                "API version must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> PipeResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PipeError::Config(format!("{} is not set", name))),
    }
}
