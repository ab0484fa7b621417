/// Errors produced by ledger operations.
///
/// Missing linens or transactions are not errors: mutations report them as
/// [`crate::Mutation::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount {0}: enter a number greater than zero")]
    InvalidAmount(i64),

    #[error("unrecognized movement: use \"add\" for delivery or \"remove\" for collection")]
    UnrecognizedMovement,

    #[error("linen name must not be empty")]
    EmptyName,

    #[error("linen {0:?} already exists")]
    Duplicate(String),
}

impl LedgerError {
    /// `true` for rejected input (as opposed to a name collision).
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Duplicate(_))
    }
}
