use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_REASONING_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_REASONING_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reasoning: ReasoningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reasoning: ReasoningConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the remote reasoning service.
///
/// The credential is optional: without one every evaluation uses the local fallback
/// explanations.
#[derive(Clone)]
pub struct ReasoningConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ReasoningConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let enabled = match env::var("APP_REASONING_ENABLED") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidReasoningFlag)?,
            Err(_) => true,
        };

        let api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let endpoint = env::var("APP_REASONING_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_REASONING_ENDPOINT.to_string());
        let model =
            env::var("APP_REASONING_MODEL").unwrap_or_else(|_| DEFAULT_REASONING_MODEL.to_string());

        let timeout_ms = env::var("APP_REASONING_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(ConfigError::InvalidReasoningTimeout)?;

        let max_tokens = env::var("APP_REASONING_MAX_TOKENS")
            .unwrap_or_else(|_| "1024".to_string())
            .parse::<u32>()
            .ok()
            .filter(|tokens| *tokens > 0)
            .ok_or(ConfigError::InvalidReasoningMaxTokens)?;

        let temperature = env::var("APP_REASONING_TEMPERATURE")
            .unwrap_or_else(|_| "0.2".to_string())
            .parse::<f32>()
            .ok()
            .filter(|value| (0.0..=1.0).contains(value))
            .ok_or(ConfigError::InvalidReasoningTemperature)?;

        Ok(Self {
            enabled,
            api_key,
            endpoint,
            model,
            timeout: Duration::from_millis(timeout_ms),
            max_tokens,
            temperature,
        })
    }

    /// Whether a remote client should be built at all.
    pub fn remote_available(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            endpoint: DEFAULT_REASONING_ENDPOINT.to_string(),
            model: DEFAULT_REASONING_MODEL.to_string(),
            timeout: Duration::from_secs(10),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

impl fmt::Debug for ReasoningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasoningConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidReasoningFlag,
    InvalidReasoningTimeout,
    InvalidReasoningMaxTokens,
    InvalidReasoningTemperature,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidReasoningFlag => {
                write!(f, "APP_REASONING_ENABLED must be true/false")
            }
            ConfigError::InvalidReasoningTimeout => {
                write!(f, "APP_REASONING_TIMEOUT_MS must be a positive integer")
            }
            ConfigError::InvalidReasoningMaxTokens => {
                write!(f, "APP_REASONING_MAX_TOKENS must be a positive integer")
            }
            ConfigError::InvalidReasoningTemperature => {
                write!(f, "APP_REASONING_TEMPERATURE must be between 0.0 and 1.0")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
