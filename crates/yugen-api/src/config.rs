//! Server configuration read from the environment.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AppError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `DATABASE_URL`; required.
    pub database_url: String,
    /// `HOST`; defaults to `0.0.0.0`.
    pub host: String,
    /// `PORT`; defaults to 3000.
    pub port: u16,
    /// `DATABASE_MAX_CONNECTIONS`; defaults to 10.
    pub max_connections: u32,
    /// `OTEL_EXPORTER_OTLP_ENDPOINT`; spans are exported only when set.
    pub otlp_endpoint: Option<String>,
    /// `CORS_ALLOW_ORIGIN`; any origin is allowed when unset.
    pub cors_allow_origin: Option<String>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or_else(|| {
            AppError::Config("DATABASE_URL environment variable must be set".into())
        })?;
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!("DATABASE_MAX_CONNECTIONS must be a valid u32: {e}"))
            })?,
            None => 10,
        };

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
            cors_allow_origin: get("CORS_ALLOW_ORIGIN"),
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for an unparsable `HOST:PORT` pair.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// The CORS layer for the configured origin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the origin is not a valid header value.
    pub fn cors_layer(&self) -> Result<CorsLayer, AppError> {
        let Some(origin) = &self.cors_allow_origin else {
            return Ok(CorsLayer::permissive());
        };
        let origin = HeaderValue::from_str(origin)
            .map_err(|e| AppError::Config(format!("CORS_ALLOW_ORIGIN is invalid: {e}")))?;
        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}
