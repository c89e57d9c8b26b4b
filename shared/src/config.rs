use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::errors::{Result, ServiceError};

fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    var_or(lookup, key, default)
        .trim()
        .parse()
        .map_err(|e| ServiceError::Internal(format!("Invalid {}: {}", key, e)))
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: var_or(&lookup, "DB_HOST", "localhost"),
            port: parse_var(&lookup, "DB_PORT", "5432")?,
            user: var_or(&lookup, "DB_USER", "postgres"),
            password: var_or(&lookup, "DB_PASSWORD", ""),
            name: var_or(&lookup, "DB_NAME", "postgres"),
            ssl_mode: parse_var(&lookup, "DB_SSL_MODE", "prefer")?,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", "20")?,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode)
    }

    /// Connection target for logs, password masked.
    pub fn redacted(&self) -> String {
        format!("postgres://{}:***@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub grpc_port: u16,
    /// Read and logged only; no authentication is enforced.
    pub auth: Option<String>,
    pub storage: Option<String>,
    pub request_timeout: Duration,
    pub metrics_port: Option<u16>,
    pub run_migrations: bool,
}

impl ServiceConfig {
    pub const DEFAULT_GRPC_PORT: u16 = 50051;
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let grpc_port = match lookup("GRPC_PORT") {
            // Listener addresses in ":50051" form are accepted as well.
            Some(raw) => raw
                .trim()
                .trim_start_matches(':')
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Invalid GRPC_PORT: {}", e)))?,
            None => Self::DEFAULT_GRPC_PORT,
        };

        let timeout_secs: u64 = parse_var(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            &Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(ServiceError::Internal(
                "Invalid REQUEST_TIMEOUT_SECS: must be greater than zero".to_string(),
            ));
        }

        let metrics_port = match lookup("METRICS_PORT") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|e| ServiceError::Internal(format!("Invalid METRICS_PORT: {}", e)))?,
            ),
            None => None,
        };

        Ok(Self {
            grpc_port,
            auth: lookup("GRPC_AUTH").filter(|v| !v.is_empty()),
            storage: lookup("GRPC_STORAGE").filter(|v| !v.is_empty()),
            request_timeout: Duration::from_secs(timeout_secs),
            metrics_port,
            run_migrations: parse_var(&lookup, "RUN_MIGRATIONS", "false")?,
        })
    }
}
