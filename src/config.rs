use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::registry::DEFAULT_LABEL;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub groq_api_key: String,
    pub groq_api_base: String,
    pub llm_timeout: Duration,
    pub default_model: String,
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("groq_api_key", &"<redacted>")
            .field("groq_api_base", &self.groq_api_base)
            .field("llm_timeout", &self.llm_timeout)
            .field("default_model", &self.default_model)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// everything except the API key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let groq_api_key = lookup("GROQ_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("GROQ_API_KEY is not set".to_string()))?;

        let groq_api_base = lookup("GROQ_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = lookup("LLM_TIMEOUT_SECS").unwrap_or_else(|| "60".to_string());
        let timeout_secs = timeout_secs
            .parse::<u64>()
            .map_err(|e| AppError::ConfigError(format!("Invalid LLM_TIMEOUT_SECS: {}", e)))?;

        let default_model = lookup("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_LABEL.to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            groq_api_key,
            groq_api_base,
            llm_timeout: Duration::from_secs(timeout_secs),
            default_model,
            log_level,
        })
    }
}
