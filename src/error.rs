use thiserror::Error;

/// Errors raised while setting up or checking a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    #[error("Invalid physical constants: {0}")]
    InvalidConstants(String),

    #[error("Non-finite value in state field `{field}`")]
    NonFinite { field: &'static str },
}
