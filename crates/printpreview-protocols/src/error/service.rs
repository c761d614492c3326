//! Printer service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Printer not found: {0}")]
    NotFound(String),

    #[error("Capabilities unavailable for printer: {0}")]
    CapabilitiesUnavailable(String),

    #[error("Access denied for printer: {0}")]
    AccessDenied(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}
