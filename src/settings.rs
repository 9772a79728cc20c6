use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

use crate::constants::{
    ANALYSIS_TIMEOUT, MAX_IMAGE_BYTES, TREND_TTL, UPLOAD_MAX_ATTEMPTS, UPLOAD_RETRY_DELAY,
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub supabase_url: String,

    #[serde(default)]
    pub supabase_service_key: String,

    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,

    #[serde(default)]
    pub gemini_api_key: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_analysis_timeout")]
    pub analysis_timeout_secs: u64,

    #[serde(default = "default_upload_attempts")]
    pub upload_max_attempts: u32,

    #[serde(default = "default_upload_retry_delay")]
    pub upload_retry_delay_ms: u64,

    #[serde(default = "default_trend_ttl")]
    pub trend_ttl_secs: u64,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Sneaker-Stylist".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_storage_bucket() -> String {
    "sneaker-images".to_string()
}
fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_analysis_timeout() -> u64 {
    ANALYSIS_TIMEOUT.as_secs()
}
fn default_upload_attempts() -> u32 {
    UPLOAD_MAX_ATTEMPTS
}
fn default_upload_retry_delay() -> u64 {
    UPLOAD_RETRY_DELAY.as_millis() as u64
}
fn default_trend_ttl() -> u64 {
    TREND_TTL.as_secs()
}
fn default_max_upload_bytes() -> usize {
    MAX_IMAGE_BYTES
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.supabase_url = fill_or_env(config.supabase_url, "APP_SUPABASE_URL")?;
        config.supabase_service_key = fill_or_env(config.supabase_service_key, "APP_SUPABASE_SERVICE_KEY")?;
        config.gemini_api_key = fill_or_env(config.gemini_api_key, "APP_GEMINI_API_KEY")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if !self.supabase_url.starts_with("http://") && !self.supabase_url.starts_with("https://") {
            errors.push("SUPABASE_URL must be an http(s) URL");
        }
        if self.storage_bucket.trim().is_empty() {
            errors.push("STORAGE_BUCKET cannot be empty");
        }
        if self.analysis_timeout_secs == 0 {
            errors.push("ANALYSIS_TIMEOUT_SECS must be positive");
        }
        if self.worker_count == 0 {
            errors.push("WORKER_COUNT must be at least 1");
        }
        if self.upload_max_attempts == 0 {
            errors.push("UPLOAD_MAX_ATTEMPTS must be at least 1");
        }
        if self.max_upload_bytes == 0 || self.max_upload_bytes > MAX_IMAGE_BYTES {
            errors.push("MAX_UPLOAD_BYTES must be between 1 byte and 10 MiB");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// Failure details are only shown to clients in development.
    pub fn exposes_error_details(&self) -> bool {
        self.env == AppEnvironment::Development
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    pub fn upload_retry_delay(&self) -> Duration {
        Duration::from_millis(self.upload_retry_delay_ms)
    }

    pub fn trend_ttl(&self) -> Duration {
        Duration::from_secs(self.trend_ttl_secs)
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_key", &self.supabase_service_key.redact())
            .field("storage_bucket", &self.storage_bucket)
            .field("gemini_api_key", &self.gemini_api_key.redact())
            .field("gemini_model", &self.gemini_model)
            .field("analysis_timeout_secs", &self.analysis_timeout_secs)
            .field("upload_max_attempts", &self.upload_max_attempts)
            .field("upload_retry_delay_ms", &self.upload_retry_delay_ms)
            .field("trend_ttl_secs", &self.trend_ttl_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
