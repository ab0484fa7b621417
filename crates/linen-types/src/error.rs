use thiserror::Error;

/// Errors produced when parsing user-supplied values into typed fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unrecognized movement: {0:?} (expected \"add\" or \"remove\")")]
    UnrecognizedMovement(String),

    #[error("invalid quantity {0:?}: enter a number greater than zero")]
    InvalidAmount(String),
}
