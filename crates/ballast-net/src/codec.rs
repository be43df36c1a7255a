//! Bit-level wire format for pump snapshots.
//!
//! Layout, most significant bit first:
//!
//! ```text
//! bit  0..5   setpoint quantum + 10, unsigned, in [0, 20]
//! bit  5      active flag
//! bits 6..8   padding, ignored on read
//! ```

use crate::error::{WireError, WireResult};
use ballast_controls::ActuatorState;
use bit_vec::BitVec;
use serde::{Deserialize, Serialize};

/// Smallest transmitted setpoint quantum.
pub const QUANTUM_MIN: i64 = -10;
/// Largest transmitted setpoint quantum.
pub const QUANTUM_MAX: i64 = 10;
/// Percent represented by one quantum.
pub const QUANTUM_STEP: f64 = 10.0;
/// Meaningful bits in a record, before padding.
pub const RECORD_BITS: usize = 6;

/// Number of bits needed to store any value of `min..=max`.
pub fn bits_for_range(min: i64, max: i64) -> usize {
    let span = max.abs_diff(min);
    (u64::BITS - span.leading_zeros()) as usize
}

/// Appends fields to a growing bit buffer.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    bits: BitVec,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bits.push(value);
    }

    /// Write `value` offset by `min` in the fewest bits covering `min..=max`.
    ///
    /// Callers pass a value inside the range; anything else is clamped.
    pub fn write_ranged(&mut self, min: i64, max: i64, value: i64) {
        debug_assert!(min <= max, "empty range {min}..={max}");
        debug_assert!((min..=max).contains(&value), "{value} outside {min}..={max}");
        let raw = value.clamp(min, max).abs_diff(min);
        let width = bits_for_range(min, max);
        for i in (0..width).rev() {
            self.bits.push((raw >> i) & 1 == 1);
        }
    }

    /// Fill with zero bits up to the next byte boundary.
    pub fn pad_to_byte(&mut self) {
        while self.bits.len() % 8 != 0 {
            self.bits.push(false);
        }
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.pad_to_byte();
        self.bits.to_bytes()
    }
}

/// Reads fields back out of a received buffer.
#[derive(Debug, Clone)]
pub struct BitReader {
    bits: BitVec,
    pos: usize,
}

impl BitReader {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bits: BitVec::from_bytes(bytes),
            pos: 0,
        }
    }

    /// Bits not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    fn require(&self, needed: usize) -> WireResult<()> {
        if self.remaining() < needed {
            return Err(WireError::Truncated {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn next_bit(&mut self) -> bool {
        let bit = self.bits.get(self.pos).unwrap_or(false);
        self.pos += 1;
        bit
    }

    pub fn read_bool(&mut self) -> WireResult<bool> {
        self.require(1)?;
        Ok(self.next_bit())
    }

    /// Read a value written by [`BitWriter::write_ranged`] with the same range.
    ///
    /// # Errors
    ///
    /// `Truncated` if the buffer ends early, `OutOfRange` if the stored bits
    /// decode past `max`.
    pub fn read_ranged(&mut self, min: i64, max: i64) -> WireResult<i64> {
        debug_assert!(min <= max, "empty range {min}..={max}");
        let width = bits_for_range(min, max);
        self.require(width)?;
        let mut raw: u64 = 0;
        for _ in 0..width {
            raw = (raw << 1) | u64::from(self.next_bit());
        }
        let value = min.saturating_add_unsigned(raw);
        if value > max {
            return Err(WireError::OutOfRange { value, min, max });
        }
        Ok(value)
    }

    /// Skip to the next byte boundary.
    pub fn skip_padding(&mut self) {
        let rem = self.pos % 8;
        if rem != 0 {
            self.pos = (self.pos + 8 - rem).min(self.bits.len());
        }
    }
}

/// The networked subset of a pump's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpSnapshot {
    quantum: i8,
    pub active: bool,
}

impl PumpSnapshot {
    /// Quantise a setpoint in percent. Out-of-range input saturates.
    pub fn new(flow_setpoint: f64, active: bool) -> Self {
        let q = (flow_setpoint / QUANTUM_STEP)
            .round()
            .clamp(QUANTUM_MIN as f64, QUANTUM_MAX as f64);
        Self {
            quantum: q as i8,
            active,
        }
    }

    pub fn from_state(state: &ActuatorState) -> Self {
        Self::new(state.flow_setpoint(), state.is_active())
    }

    /// Transmitted setpoint in tens of percent, in `[-10, 10]`.
    pub fn quantum(&self) -> i8 {
        self.quantum
    }

    /// Setpoint in percent as the receiver will apply it.
    pub fn flow_setpoint(&self) -> f64 {
        f64::from(self.quantum) * QUANTUM_STEP
    }
}

/// Serialise a snapshot into one padded byte.
pub fn encode(snapshot: &PumpSnapshot) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_ranged(QUANTUM_MIN, QUANTUM_MAX, i64::from(snapshot.quantum));
    w.write_bool(snapshot.active);
    w.into_bytes()
}

/// Parse a record produced by [`encode`]. Padding bits are ignored.
pub fn decode(bytes: &[u8]) -> WireResult<PumpSnapshot> {
    let mut r = BitReader::new(bytes);
    let quantum = r.read_ranged(QUANTUM_MIN, QUANTUM_MAX)?;
    let active = r.read_bool()?;
    r.skip_padding();
    Ok(PumpSnapshot {
        // read_ranged bounds the value to [-10, 10]
        quantum: quantum as i8,
        active,
    })
}
