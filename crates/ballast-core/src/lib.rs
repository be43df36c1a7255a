//! ballast-core: shared foundation for the ballast workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers used by every kernel crate)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
