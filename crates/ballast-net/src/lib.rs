//! Network synchronisation of pump state.
//!
//! A pump's networked state is one byte: the flow setpoint quantised to tens of
//! percent and the active flag. Records arrive over an unordered transport with a
//! send timestamp attached by the transport; [`NetworkSync::merge`] applies a record
//! only if it is not older than the last one accepted.

pub mod codec;
pub mod error;
pub mod sync;

pub use codec::{BitReader, BitWriter, PumpSnapshot, RECORD_BITS, decode, encode};
pub use error::{WireError, WireResult};
pub use sync::{MergeOutcome, NetworkSync};
