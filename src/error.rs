//! Crate-wide error type.
//!
//! Mirrors the original's small exception hierarchy (`exInvalidTk`,
//! `exInvalidOp`, `exInvalidVar`, `exBadArgN`, plus runtime errors raised
//! during evaluation) as a flat [`thiserror`](https://docs.rs/thiserror)
//! enum instead of a class hierarchy caught by base-class reference.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("invalid operator: {0}")]
    InvalidOp(String),

    #[error("invalid variable: {0}")]
    InvalidVariable(String),

    #[error("wrong number of arguments for {name}: expected {expected}, got {got}")]
    BadArgCount {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("{0}")]
    EvalError(String),

    #[error("malformed number")]
    MalformedNumber,
}
