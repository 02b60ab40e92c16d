use crate::condition::Operator;
use thiserror::Error;

/// Errors raised by a row editor when an action does not fit its current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Row is already saved; reopen it to edit")]
    AlreadySaved,

    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    #[error("Operator '{operator}' is not allowed for column '{column}'")]
    OperatorNotAllowed { operator: Operator, column: String },

    #[error("Cannot {action} while the row is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("'{0}' is not a complete condition")]
    IncompleteCondition(String),
}

/// Errors raised by the condition list controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("Row {index} does not exist (list has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },
}
