//! Error types for ndau math and scalar parsing.
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")] Overflow,
    #[error("divide by zero")] DivideByZero,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid {kind}: {input:?}")] Invalid { kind: &'static str, input: String },
    #[error("{kind} {input:?} has more than {max} fractional digits")] TooPrecise { kind: &'static str, input: String, max: usize },
    #[error("{kind} {input:?} is out of range")] OutOfRange { kind: &'static str, input: String },
    #[error("date is before epoch start")] DateBeforeEpoch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("lock is already notified")] AlreadyNotified,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateTableError {
    #[error("row {index} starts before zero")] NegativeThreshold { index: usize },
    #[error("row {index} does not start after its predecessor")] Unsorted { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NdauError {
    #[error(transparent)] Math(#[from] MathError),
    #[error(transparent)] Parse(#[from] ParseError),
    #[error(transparent)] Lock(#[from] LockError),
    #[error(transparent)] RateTable(#[from] RateTableError),
    #[error("codec: {0}")] Codec(String),
}

impl ParseError {
    pub fn invalid(kind: &'static str, input: &str) -> Self {
        Self::Invalid { kind, input: input.to_string() }
    }

    pub fn out_of_range(kind: &'static str, input: &str) -> Self {
        Self::OutOfRange { kind, input: input.to_string() }
    }
}
