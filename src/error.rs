//! Error types for taru-plan.
//!
//! The planner has no runtime failure modes: a growth step that adds no
//! node returns `None`, never an error. Errors exist only at construction
//! time, for an unrecognized strategy identifier or a nonsensical
//! configuration.

use thiserror::Error;

/// Planner error type
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for PlanError {
    fn from(e: toml::de::Error) -> Self {
        PlanError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
