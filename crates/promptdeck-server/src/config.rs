//! Server configuration management

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Shared JSON file holding the template collection
    pub prompts_file: PathBuf,

    /// CORS allowed origins, `*` for any
    pub cors_origins: Vec<String>,

    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,

    /// Whether to enable debug logging
    pub debug: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            prompts_file: std::env::var("PROMPTS_FILE")
                .unwrap_or_else(|_| promptdeck::config::DEFAULT_FILE.to_string())
                .into(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid MAX_BODY_BYTES value".to_string()))?,
            debug: std::env::var("DEBUG")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            prompts_file: PathBuf::from(promptdeck::config::DEFAULT_FILE),
            cors_origins: vec!["*".to_string()],
            max_body_bytes: 10 * 1024 * 1024,
            debug: false,
        }
    }
}
