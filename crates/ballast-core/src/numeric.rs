use crate::{CoreError, CoreResult};

/// Floating point type used throughout the kernel.
pub type Real = f64;

/// Signed percentage bounds shared by the flow setpoint and control signals.
pub const PERCENT_MIN: Real = -100.0;
pub const PERCENT_MAX: Real = 100.0;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Ensure `v` is finite and lies in `[min, max]`.
pub fn ensure_in_range(v: Real, min: Real, max: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(CoreError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// Round to the nearest multiple of `step` (halves away from zero).
///
/// A non-positive step returns the value unchanged.
pub fn round_to(value: Real, step: Real) -> Real {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Clamp into the signed percentage range.
///
/// `NaN` passes through unchanged, infinities saturate.
#[inline]
pub fn clamp_percent(value: Real) -> Real {
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_in_range_bounds() {
        assert!(ensure_in_range(0.0, 0.0, 1.0, "x").is_ok());
        assert!(ensure_in_range(1.0, 0.0, 1.0, "x").is_ok());
        assert!(matches!(
            ensure_in_range(1.5, 0.0, 1.0, "x"),
            Err(CoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            ensure_in_range(Real::INFINITY, 0.0, 1.0, "x"),
            Err(CoreError::NonFinite { .. })
        ));
    }

    #[test]
    fn round_to_steps() {
        assert_eq!(round_to(43.0, 10.0), 40.0);
        assert_eq!(round_to(45.0, 10.0), 50.0);
        assert_eq!(round_to(-45.0, 10.0), -50.0);
        assert_eq!(round_to(12.4, 1.0), 12.0);
        assert_eq!(round_to(7.0, 0.0), 7.0);
    }

    #[test]
    fn clamp_percent_saturates() {
        assert_eq!(clamp_percent(300.0), 100.0);
        assert_eq!(clamp_percent(-300.0), -100.0);
        assert_eq!(clamp_percent(Real::INFINITY), 100.0);
        assert!(clamp_percent(Real::NAN).is_nan());
    }
}
