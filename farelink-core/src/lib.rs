pub mod backend;
pub mod booking;
pub mod flight;
pub mod service;

pub use backend::{FlightBackend, LocationType};
pub use service::FlightService;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Authentication failed with the flight data provider")]
    ProviderAuth,
    #[error("Provider error (status {status}): {body}")]
    Provider { status: u16, body: String },
    #[error("Provider request failed: {0}")]
    Transport(String),
    #[error("Operation not supported by this backend: {0}")]
    Unsupported(&'static str),
    #[error("Store error: {0}")]
    Store(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        CoreError::NotFound(msg.into())
    }

    pub fn store(err: impl std::fmt::Display) -> Self {
        CoreError::Store(err.to_string())
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        CoreError::Transport(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
