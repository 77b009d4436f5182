use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the single page application and uploaded files.
    pub www_root: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    /// Signing secret for web tokens. A random one is generated per process when unset.
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: u64,
    /// scrypt cost parameter, N = 2^scrypt_log_n.
    pub scrypt_log_n: u8,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("scrypt_log_n", &self.scrypt_log_n)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Sessions not seen for this long are removed by the cleaner.
    pub idle_timeout_secs: u64,
    pub clean_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub max_body_bytes: usize,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of APP)
            // Eg.. `APP_SERVER__PORT=9000 ./target/app` would set `server.port`
            .add_source(Environment::with_prefix("app").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                www_root: "www".to_string(),
            },
            database: None,
            auth: AuthConfig {
                jwt_secret: None,
                token_ttl_secs: 5 * 60,
                scrypt_log_n: 16,
            },
            session: SessionConfig {
                idle_timeout_secs: 10 * 60,
                clean_interval_secs: 60,
            },
            upload: UploadConfig {
                max_body_bytes: 32 << 20,
            },
        }
    }
}
