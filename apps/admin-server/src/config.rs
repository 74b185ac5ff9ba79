// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup. A `.env`
//! file in the working directory is loaded first when present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOKEN_SECRET_KEY` | Secret the token encryption key is derived from | Required |
//! | `DATABASE_URL` | PostgreSQL connection URL | Unset: in-memory store |
//! | `DB_MAX_CONNECTIONS` | Connection pool size | `10` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `9001` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `SEED_ADMIN_EMAIL` | Verified admin created in development mode | Optional |
//! | `SEED_ADMIN_PASSWORD` | Password for the seeded admin | Optional |

use std::env;
use std::net::SocketAddr;

/// Environment variable name for the token secret.
///
/// Every issued token is encrypted under a key derived from this value.
/// Changing it invalidates all outstanding tokens.
pub const TOKEN_SECRET_KEY_ENV: &str = "TOKEN_SECRET_KEY";

/// Environment variable name for the PostgreSQL URL.
///
/// When unset the server runs against an in-memory store that is lost on
/// restart.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

pub const DB_MAX_CONNECTIONS_ENV: &str = "DB_MAX_CONNECTIONS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9001;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Administrator created at startup when running without a database.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub token_secret: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub seed_admin: Option<SeedAdmin>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token_secret", &"<redacted>")
            .field("database", &self.database_url.as_ref().map(|_| "<configured>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .field("seed_admin", &self.seed_admin)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token_secret = var(TOKEN_SECRET_KEY_ENV).ok_or(ConfigError::Missing(TOKEN_SECRET_KEY_ENV))?;

        let db_max_connections = match var(DB_MAX_CONNECTIONS_ENV) {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: DB_MAX_CONNECTIONS_ENV,
                        value,
                    })
                }
            },
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let port = match var(PORT_ENV) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        let seed_admin = match (var(SEED_ADMIN_EMAIL_ENV), var(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(SeedAdmin { email, password }),
            _ => None,
        };

        Ok(Self {
            token_secret,
            database_url: var(DATABASE_URL_ENV),
            db_max_connections,
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_format,
            seed_admin,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: self.host.clone(),
            })
    }
}
