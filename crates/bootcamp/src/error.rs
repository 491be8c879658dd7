use std::io;
use std::net::SocketAddr;

use crate::config::ConfigError;
use crate::services::ServiceError;
use crate::telemetry::TelemetryError;

/// Startup and CLI level failures. Request-level failures stay [`ServiceError`]s.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}
