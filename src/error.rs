//! Error types for the planners.

use std::fmt;

use thiserror::Error;

/// Which end of a planning query an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::Goal => f.write_str("goal"),
        }
    }
}

/// Reasons a planning query can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// None of the supplied candidates for an endpoint is collision free.
    #[error("no collision free {endpoint} configuration")]
    InvalidStartOrGoal { endpoint: Endpoint },

    /// The iteration or node budget was consumed without reaching the goal.
    #[error("search exhausted after {iterations} iterations")]
    SearchExhausted { iterations: usize },

    /// A graph invariant was violated. Indicates a bug or a corrupted graph.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// Missing or malformed tuning parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The free sampler could not find a collision free configuration.
    #[error("no free configuration found after {attempts} attempts")]
    SamplerExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, PlanError>;
