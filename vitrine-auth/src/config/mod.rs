use service_core::config as core_config;
use service_core::error::AppError;
use std::cell::RefCell;
use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub request_timeout_seconds: u64,
    /// Secrets that fell back to their development default. Logged once
    /// tracing is up.
    pub defaulted_secrets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub signing: JwtSigning,
    pub token_expiry_minutes: i64,
    /// Permissions embedded when a token is issued without an explicit set.
    pub default_permissions: Vec<String>,
}

#[derive(Clone)]
pub enum JwtSigning {
    /// HS256 with a shared secret.
    Secret(String),
    /// RS256 with PEM encoded key files.
    RsaKeyFiles {
        private_key_path: String,
        public_key_path: String,
    },
}

impl std::fmt::Debug for JwtSigning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtSigning::Secret(_) => f.write_str("Secret(<redacted>)"),
            JwtSigning::RsaKeyFiles {
                private_key_path,
                public_key_path,
            } => f
                .debug_struct("RsaKeyFiles")
                .field("private_key_path", private_key_path)
                .field("public_key_path", public_key_path)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

const DEV_JWT_SECRET: &str = "vitrine-dev-secret-change-me";

/// Ten years.
const MAX_TOKEN_EXPIRY_MINUTES: i64 = 525_600 * 10;

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars {
            lookup: &lookup,
            is_prod: false,
            defaulted: RefCell::default(),
        };
        let environment: Environment = vars
            .get("ENVIRONMENT", Some("dev"))?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let vars = Vars {
            lookup: &lookup,
            is_prod: environment == Environment::Prod,
            defaulted: RefCell::default(),
        };

        let signing = match (
            lookup("JWT_PRIVATE_KEY_PATH"),
            lookup("JWT_PUBLIC_KEY_PATH"),
        ) {
            (Some(private_key_path), Some(public_key_path)) => JwtSigning::RsaKeyFiles {
                private_key_path,
                public_key_path,
            },
            (None, None) => JwtSigning::Secret(vars.secret("JWT_SECRET", DEV_JWT_SECRET)?),
            _ => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "JWT_PRIVATE_KEY_PATH and JWT_PUBLIC_KEY_PATH must be set together"
                )))
            }
        };

        let config = AuthConfig {
            common,
            environment: environment.clone(),
            service_name: vars.get("SERVICE_NAME", Some("vitrine-auth"))?,
            service_version: vars.get("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")))?,
            log_level: vars.get("LOG_LEVEL", Some("info"))?,
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                url: vars.secret("DATABASE_URL", "postgres://localhost/vitrine")?,
                max_connections: vars.parse("DATABASE_MAX_CONNECTIONS", "10")?,
            },
            jwt: JwtConfig {
                signing,
                token_expiry_minutes: vars.parse("JWT_TOKEN_EXPIRY_MINUTES", "1440")?,
                default_permissions: split_list(&vars.get("JWT_DEFAULT_PERMISSIONS", Some(""))?),
            },
            security: SecurityConfig {
                allowed_origins: split_list(
                    &vars.get("ALLOWED_ORIGINS", Some("http://localhost:3000"))?,
                ),
            },
            request_timeout_seconds: vars.parse("REQUEST_TIMEOUT_SECONDS", "30")?,
            defaulted_secrets: vars.defaulted.take(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "APP__PORT must be greater than 0"
            )));
        }

        if self.jwt.token_expiry_minutes <= 0
            || self.jwt.token_expiry_minutes > MAX_TOKEN_EXPIRY_MINUTES
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_TOKEN_EXPIRY_MINUTES must be between 1 and {}",
                MAX_TOKEN_EXPIRY_MINUTES
            )));
        }

        if self.request_timeout_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "REQUEST_TIMEOUT_SECONDS must be positive"
            )));
        }

        if self.environment == Environment::Prod
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Wildcard CORS origin not allowed in production"
            )));
        }

        Ok(())
    }
}

struct Vars<'a, F> {
    lookup: &'a F,
    is_prod: bool,
    defaulted: RefCell<Vec<String>>,
}

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str, default: Option<&str>) -> Result<String, AppError> {
        match ((self.lookup)(key), default) {
            (Some(val), _) => Ok(val),
            (None, Some(def)) => Ok(def.to_string()),
            (None, None) => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        }
    }

    /// Secrets fall back to a development default outside production only.
    fn secret(&self, key: &str, dev_default: &str) -> Result<String, AppError> {
        match (self.lookup)(key) {
            Some(val) => Ok(val),
            None if self.is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required in production but not set",
                key
            ))),
            None => {
                self.defaulted.borrow_mut().push(key.to_string());
                Ok(dev_default.to_string())
            }
        }
    }

    fn parse<T>(&self, key: &str, default: &str) -> Result<T, AppError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key, Some(default))?
            .trim()
            .parse()
            .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e)))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
