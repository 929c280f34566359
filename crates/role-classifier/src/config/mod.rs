use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::classification::{RuleBook, RuleConfigError};
use crate::dataset::{
    DatasetColumns, DEFAULT_LABEL_COLUMN, DEFAULT_SKILLS_COLUMN, DEFAULT_TITLE_COLUMN,
};

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
    pub classifier: ClassifierConfig,
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

        let classifier = ClassifierConfig {
            rules_path: env::var("ROLE_RULES_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            title_column: env::var("ROLE_TITLE_COLUMN")
                .unwrap_or_else(|_| DEFAULT_TITLE_COLUMN.to_string()),
            skills_column: env::var("ROLE_SKILLS_COLUMN")
                .unwrap_or_else(|_| DEFAULT_SKILLS_COLUMN.to_string()),
            label_column: env::var("ROLE_LABEL_COLUMN")
                .unwrap_or_else(|_| DEFAULT_LABEL_COLUMN.to_string()),
            verbose: parse_flag("ROLE_VERBOSE")?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            classifier,
        })
    }
}

fn parse_flag(variable: &'static str) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(variable) else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidFlag {
            variable,
            value: raw,
        }),
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

/// Rule source, dataset column names and phase logging.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub rules_path: Option<PathBuf>,
    pub title_column: String,
    pub skills_column: String,
    pub label_column: String,
    pub verbose: bool,
}

impl ClassifierConfig {
    /// The configured rule file, or the built-in rules when none is set.
    pub fn rule_book(&self) -> Result<RuleBook, RuleConfigError> {
        match &self.rules_path {
            Some(path) => RuleBook::from_path(path),
            None => Ok(RuleBook::standard()),
        }
    }

    pub fn columns(&self) -> DatasetColumns {
        DatasetColumns {
            title: self.title_column.clone(),
            skills: self.skills_column.clone(),
            id: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { variable, value } => {
                write!(f, "{variable} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidFlag { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
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
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "ROLE_RULES_PATH",
            "ROLE_TITLE_COLUMN",
            "ROLE_SKILLS_COLUMN",
            "ROLE_LABEL_COLUMN",
            "ROLE_VERBOSE",
        ] {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.classifier.title_column, "job_title");
        assert_eq!(config.classifier.skills_column, "skills_list");
        assert_eq!(config.classifier.label_column, "role_category");
        assert!(config.classifier.rules_path.is_none());
        assert!(!config.classifier.verbose);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn classifier_settings_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ROLE_TITLE_COLUMN", "title");
        env::set_var("ROLE_SKILLS_COLUMN", "skills");
        env::set_var("ROLE_VERBOSE", "yes");
        let config = AppConfig::load().expect("config loads");
        let columns = config.classifier.columns();
        assert_eq!(columns.title, "title");
        assert_eq!(columns.skills, "skills");
        assert!(config.classifier.verbose);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_flag() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ROLE_VERBOSE", "sometimes");
        let err = AppConfig::load().expect_err("flag rejected");
        assert!(err.to_string().contains("ROLE_VERBOSE"));
        reset_env();
    }

    #[test]
    fn built_in_rules_are_used_without_a_rules_path() {
        let config = ClassifierConfig {
            rules_path: None,
            title_column: DEFAULT_TITLE_COLUMN.to_string(),
            skills_column: DEFAULT_SKILLS_COLUMN.to_string(),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            verbose: false,
        };
        assert_eq!(config.rule_book().expect("rules"), RuleBook::standard());
    }
}
