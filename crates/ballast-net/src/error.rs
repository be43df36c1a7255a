//! Error types for wire decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type WireResult<T> = Result<T, WireError>;

/// Reasons a wire record cannot be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireError {
    #[error("Truncated record: needed {needed} bits, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Value out of range: {value} (expected {min}..={max})")]
    OutOfRange { value: i64, min: i64, max: i64 },
}
