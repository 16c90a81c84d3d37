use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct CourseConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub catalog: CatalogConfig,
    pub security: SecurityConfig,
    pub swagger_enabled: bool,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogBackend {
    Mongo,
    Snapshot,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub backend: CatalogBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub snapshot_path: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests: u32,
    pub window_seconds: u64,
    /// Key clients on `x-forwarded-for`. Only safe behind a proxy that sets it.
    pub trust_forwarded_for: bool,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl FromStr for CatalogBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(CatalogBackend::Mongo),
            "snapshot" | "file" => Ok(CatalogBackend::Snapshot),
            _ => Err(format!("Invalid catalog backend: {}", s)),
        }
    }
}

impl CourseConfig {
    pub fn load() -> Result<Self, AppError> {
        // Handles .env and the APP__ prefix.
        let common_config = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let backend: CatalogBackend = get_env("CATALOG_BACKEND", Some("mongo"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // Mongo settings are only mandatory when Mongo backs the catalog.
        let mongo_required = is_prod && backend == CatalogBackend::Mongo;
        let mongodb_uri = match backend {
            CatalogBackend::Mongo => Some(get_env("MONGODB_URI", None, is_prod)?),
            CatalogBackend::Snapshot => env::var("MONGODB_URI").ok(),
        };

        Ok(CourseConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("course-information-service"), false)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            catalog: CatalogConfig {
                backend,
                mongodb_uri,
                mongodb_database: get_env(
                    "MONGODB_DATABASE",
                    Some("course_information"),
                    mongo_required,
                )?,
                snapshot_path: get_env(
                    "CATALOG_SNAPSHOT_PATH",
                    Some("data/catalog.sample.json"),
                    false,
                )?,
            },
            security: SecurityConfig {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?),
            },
            swagger_enabled: parse_flag(&get_env(
                "ENABLE_SWAGGER",
                Some(if is_prod { "false" } else { "true" }),
                false,
            )?)?,
            rate_limit: RateLimitConfig {
                requests: parse_number(
                    "RATE_LIMIT_REQUESTS",
                    &get_env("RATE_LIMIT_REQUESTS", Some("120"), false)?,
                )?,
                window_seconds: parse_number(
                    "RATE_LIMIT_WINDOW_SECONDS",
                    &get_env("RATE_LIMIT_WINDOW_SECONDS", Some("60"), false)?,
                )?,
                trust_forwarded_for: parse_flag(&get_env(
                    "TRUST_FORWARDED_FOR",
                    Some("false"),
                    false,
                )?)?,
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "Invalid boolean flag: {}",
            other
        ))),
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} must be a number: {}", key, e))
    })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
