use crate::error::{Error, Result};
use axum::http::StatusCode;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_GENERATION_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub capture_path: String,
    pub capture_status_code: StatusCode,
    pub page_size: i64,
    pub max_body_bytes: usize,
    pub generation_api_url: String,
    pub generation_api_key: String,
    pub generation_model: String,
    pub generation_timeout: Duration,
    pub seed_count: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3333".to_string(),
            database_url: None,
            database_max_connections: 20,
            capture_path: "/capture".to_string(),
            capture_status_code: StatusCode::OK,
            page_size: 20,
            max_body_bytes: 10 * 1024 * 1024,
            generation_api_url: DEFAULT_GENERATION_API_URL.to_string(),
            generation_api_key: String::new(),
            generation_model: "gemini-2.5-flash".to_string(),
            generation_timeout: Duration::from_secs(120),
            seed_count: 70,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        let capture_path = get_env_or("CAPTURE_PATH", &defaults.capture_path);
        validate_capture_path(&capture_path)?;

        let status: u16 = get_env_parse_or("CAPTURE_STATUS_CODE", 200)?;
        let capture_status_code = StatusCode::from_u16(status)
            .map_err(|e| Error::Config(format!("Invalid value for CAPTURE_STATUS_CODE: {}", e)))?;

        let page_size: i64 = get_env_parse_or("PAGE_SIZE", defaults.page_size)?;
        if page_size < 1 {
            return Err(Error::Config("PAGE_SIZE must be positive".to_string()));
        }

        let log_format = match get_env_or("LOG_FORMAT", "text").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" | "" => LogFormat::Text,
            other => {
                return Err(Error::Config(format!(
                    "Invalid value for LOG_FORMAT: {}",
                    other
                )))
            }
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", &defaults.server_address),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            database_max_connections: get_env_parse_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            capture_path,
            capture_status_code,
            page_size,
            max_body_bytes: get_env_parse_or("MAX_BODY_BYTES", defaults.max_body_bytes)?,
            generation_api_url: get_env_or("GENERATION_API_URL", &defaults.generation_api_url),
            generation_api_key: get_env_or("GENERATION_API_KEY", ""),
            generation_model: get_env_or("GENERATION_MODEL", &defaults.generation_model),
            generation_timeout: Duration::from_secs(get_env_parse_or(
                "GENERATION_TIMEOUT_SECS",
                120u64,
            )?),
            seed_count: get_env_parse_or("SEED_COUNT", defaults.seed_count)?,
            log_format,
        })
    }
}

/// The capture routes must not shadow or sit beside the inspection API and health check.
fn validate_capture_path(path: &str) -> Result<()> {
    let normalized = path.trim_end_matches('/');
    let reserved = ["/api", "/health"]
        .iter()
        .any(|r| normalized == *r || normalized.starts_with(&format!("{}/", r)));
    if !path.starts_with('/') || reserved {
        return Err(Error::Config(format!(
            "Invalid value for CAPTURE_PATH: {} (must start with '/' and not use /api or /health)",
            path
        )));
    }
    Ok(())
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}
