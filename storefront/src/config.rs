//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_API_BASE` - Base URL of the shop API (default: http://localhost:3001/api)
//! - `RUST_LOG` - Log filter (default: info)

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:3001/api";
const API_BASE_VAR: &str = "STOREFRONT_API_BASE";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL every API path is appended to
    pub api_base: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `STOREFRONT_API_BASE` is not an absolute
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw = std::env::var(API_BASE_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Ok(Self {
            api_base: parse_api_base(&raw)?,
        })
    }
}

fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar(API_BASE_VAR.to_string(), reason);
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_api() {
        assert_eq!(parse_api_base(DEFAULT_API_BASE).unwrap().as_str(), DEFAULT_API_BASE);
    }

    #[test]
    fn accepts_https_with_path() {
        let url = parse_api_base(" https://shop.example.com/v2/api ").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/v2/api");
    }

    #[test]
    fn rejects_relative_urls() {
        assert!(matches!(parse_api_base("/api"), Err(ConfigError::InvalidEnvVar(..))));
    }

    #[test]
    fn rejects_other_schemes() {
        let err = parse_api_base("ftp://localhost/api").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme ftp"));
    }
}
