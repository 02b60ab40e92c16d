use thiserror::Error;

/// Errors that can occur when reading an operator token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorParseError {
    #[error(
        "Unknown operator: '{0}'. Valid operators are: >, <, >=, <=, =, !=, IN, IS NULL, IS NOT NULL, LIKE"
    )]
    UnknownOperator(String),
}
