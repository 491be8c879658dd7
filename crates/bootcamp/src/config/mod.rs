use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEVELOPMENT_TOKEN_SECRET: &str = "development-only-secret-change-me-before-deploying";
const MIN_TOKEN_SECRET_BYTES: usize = 32;
/// Upper bound on `AUTH_TOKEN_EXPIRY_MINUTES`: one week.
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 7 * 24 * 60;

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
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub uploads: UploadConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5158".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:5174".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => match LogFormat::parse(&raw) {
                Some(format) => format,
                None => return Err(ConfigError::InvalidLogFormat { value: raw }),
            },
            Err(_) => LogFormat::Compact,
        };

        let auth = AuthConfig::from_env(environment)?;

        let rate_limit = RateLimitConfig {
            general_per_minute: parse_number("RATE_LIMIT_GENERAL_PER_MINUTE", 100)?,
            login_per_minute: parse_number("RATE_LIMIT_LOGIN_PER_MINUTE", 5)?,
        };

        let uploads = UploadConfig {
            directory: PathBuf::from(
                env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            max_bytes: parse_number("UPLOAD_MAX_BYTES", 5 * 1024 * 1024)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                allowed_origins,
            },
            telemetry: TelemetryConfig { log_level, format },
            auth,
            rate_limit,
            uploads,
        })
    }
}

impl AppConfig {
    /// Built-in defaults without reading the environment; used by the demo and tests.
    pub fn development() -> Self {
        Self {
            environment: AppEnvironment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5158,
                allowed_origins: vec![
                    "http://localhost:5173".to_string(),
                    "http://localhost:5174".to_string(),
                ],
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
                format: LogFormat::Pretty,
            },
            auth: AuthConfig::development(),
            rate_limit: RateLimitConfig::default(),
            uploads: UploadConfig {
                directory: PathBuf::from("uploads"),
                max_bytes: 5 * 1024 * 1024,
            },
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
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
    pub format: LogFormat,
}

/// Output layout of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line records without colour, for log shippers.
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Signing material and claim settings for issued bearer tokens.
#[derive(Clone)]
pub struct AuthConfig {
    pub token_secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_lifetime_minutes: i64,
}

impl AuthConfig {
    fn from_env(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let token_secret = match env::var("AUTH_TOKEN_SECRET") {
            Ok(secret) => secret,
            Err(_) if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingTokenSecret)
            }
            Err(_) => DEVELOPMENT_TOKEN_SECRET.to_string(),
        };
        if token_secret.len() < MIN_TOKEN_SECRET_BYTES {
            return Err(ConfigError::TokenSecretTooShort {
                min: MIN_TOKEN_SECRET_BYTES,
            });
        }

        let token_lifetime_minutes = parse_number("AUTH_TOKEN_EXPIRY_MINUTES", 60)?;
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&token_lifetime_minutes) {
            return Err(ConfigError::InvalidTokenLifetime {
                minutes: token_lifetime_minutes,
            });
        }

        Ok(Self {
            token_secret,
            issuer: env::var("AUTH_TOKEN_ISSUER").unwrap_or_else(|_| "bootcamp-api".to_string()),
            audience: env::var("AUTH_TOKEN_AUDIENCE")
                .unwrap_or_else(|_| "bootcamp-clients".to_string()),
            token_lifetime_minutes,
        })
    }

    /// Configuration used by tests and the CLI demo.
    pub fn development() -> Self {
        Self {
            token_secret: DEVELOPMENT_TOKEN_SECRET.to_string(),
            issuer: "bootcamp-api".to_string(),
            audience: "bootcamp-clients".to_string(),
            token_lifetime_minutes: 60,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_lifetime_minutes", &self.token_lifetime_minutes)
            .finish()
    }
}

/// Per-IP request budgets applied by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub general_per_minute: u32,
    pub login_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_minute: 100,
            login_per_minute: 5,
        }
    }
}

/// Résumé upload storage settings.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub directory: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    InvalidLogFormat { value: String },
    MissingTokenSecret,
    TokenSecretTooShort { min: usize },
    InvalidTokenLifetime { minutes: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a valid number"),
            ConfigError::InvalidLogFormat { value } => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'pretty', got '{value}'")
            }
            ConfigError::MissingTokenSecret => {
                write!(f, "AUTH_TOKEN_SECRET is required in production")
            }
            ConfigError::TokenSecretTooShort { min } => {
                write!(f, "AUTH_TOKEN_SECRET must be at least {min} bytes")
            }
            ConfigError::InvalidTokenLifetime { minutes } => write!(
                f,
                "AUTH_TOKEN_EXPIRY_MINUTES must be between 1 and {MAX_TOKEN_LIFETIME_MINUTES}, got {minutes}"
            ),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "AUTH_TOKEN_SECRET",
            "AUTH_TOKEN_ISSUER",
            "AUTH_TOKEN_AUDIENCE",
            "AUTH_TOKEN_EXPIRY_MINUTES",
            "RATE_LIMIT_GENERAL_PER_MINUTE",
            "RATE_LIMIT_LOGIN_PER_MINUTE",
            "UPLOADS_DIR",
            "UPLOAD_MAX_BYTES",
            "CORS_ALLOWED_ORIGINS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5158);
        assert_eq!(config.server.allowed_origins.len(), 2);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.auth.token_lifetime_minutes, 60);
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 5158));
    }

    #[test]
    fn production_requires_token_secret() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let result = AppConfig::load();
        reset_env();
        assert!(matches!(result, Err(ConfigError::MissingTokenSecret)));
    }

    #[test]
    fn rejects_short_token_secret_and_bad_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AUTH_TOKEN_SECRET", "short");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::TokenSecretTooShort { min: 32 })
        ));

        reset_env();
        env::set_var("RATE_LIMIT_LOGIN_PER_MINUTE", "many");
        let result = AppConfig::load();
        reset_env();
        match result {
            Err(ConfigError::InvalidNumber { key }) => {
                assert_eq!(key, "RATE_LIMIT_LOGIN_PER_MINUTE")
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn log_format_must_be_known() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_LOG_FORMAT", "Pretty");
        let pretty = AppConfig::load().map(|config| config.telemetry.format);
        env::set_var("APP_LOG_FORMAT", "xml");
        let unknown = AppConfig::load();
        reset_env();
        assert_eq!(pretty.expect("pretty accepted"), LogFormat::Pretty);
        assert!(matches!(unknown, Err(ConfigError::InvalidLogFormat { .. })));
    }

    #[test]
    fn token_lifetime_must_be_positive_and_bounded() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AUTH_TOKEN_EXPIRY_MINUTES", "-5");
        let negative = AppConfig::load();
        env::set_var("AUTH_TOKEN_EXPIRY_MINUTES", "0");
        let zero = AppConfig::load();
        env::set_var("AUTH_TOKEN_EXPIRY_MINUTES", i64::MAX.to_string());
        let huge = AppConfig::load();
        env::set_var("AUTH_TOKEN_EXPIRY_MINUTES", MAX_TOKEN_LIFETIME_MINUTES.to_string());
        let ceiling = AppConfig::load();
        reset_env();

        assert!(matches!(
            negative,
            Err(ConfigError::InvalidTokenLifetime { minutes: -5 })
        ));
        assert!(matches!(
            zero,
            Err(ConfigError::InvalidTokenLifetime { minutes: 0 })
        ));
        assert!(matches!(
            huge,
            Err(ConfigError::InvalidTokenLifetime { minutes: i64::MAX })
        ));
        assert_eq!(
            ceiling.expect("a week is allowed").auth.token_lifetime_minutes,
            MAX_TOKEN_LIFETIME_MINUTES
        );
    }

    #[test]
    fn auth_config_debug_redacts_secret() {
        let rendered = format!("{:?}", AuthConfig::development());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(DEVELOPMENT_TOKEN_SECRET));
    }
}
