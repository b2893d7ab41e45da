use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_response: ApiResponseConfig,
    pub server: ServerConfig,
}

/// Switches for the response layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponseConfig {
    /// Install the failure translation middleware and not-found fallback
    pub enabled: bool,
}

impl Default for ApiResponseConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ApiResponseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            enabled: env::var("API_RESPONSE_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("API_RESPONSE_ENABLED must be true or false")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            api_response: ApiResponseConfig::from_env()?,
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let config = Config {
            api_response: ApiResponseConfig::default(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
        };

        assert_eq!(config.server_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_translation_enabled_by_default() {
        assert!(ApiResponseConfig::default().enabled);
    }
}
