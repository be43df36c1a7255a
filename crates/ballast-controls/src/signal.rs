//! Control lines, payload parsing and the typed command set.

use crate::error::ControlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical input a pump listens on. Names are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLine {
    Toggle,
    SetActive,
    SetSpeed,
    #[serde(rename = "set_targetlevel")]
    SetTargetLevel,
}

impl ControlLine {
    pub const ALL: [ControlLine; 4] = [
        ControlLine::Toggle,
        ControlLine::SetActive,
        ControlLine::SetSpeed,
        ControlLine::SetTargetLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::SetActive => "set_active",
            Self::SetSpeed => "set_speed",
            Self::SetTargetLevel => "set_targetlevel",
        }
    }
}

impl fmt::Display for ControlLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlLine {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|line| line.as_str() == s)
            .ok_or_else(|| ControlError::UnknownLine {
                line: s.to_string(),
            })
    }
}

/// Everything that can be asked of a pump from outside the tick loop.
///
/// Logic signals arrive as [`ControlLine`] + payload and parse into the first four
/// variants. The remaining variants are operator actions from a local panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Flip the active flag, leaving target-level mode alone.
    RemoteToggle,
    SetActive { active: bool },
    /// Raw speed in percent, clamped but not rounded.
    SetSpeed { value: f64 },
    /// Signal value on the shared `[-100, 100]` domain, remapped to a fill level.
    SetTargetLevel { signal: f64 },
    /// Flip the active flag and return to manual mode.
    ManualOverrideToggle,
    /// Raise the setpoint by one step.
    NudgeIn,
    /// Lower the setpoint by one step.
    NudgeOut,
}

impl Command {
    /// Interpret a payload received on `line`.
    ///
    /// Returns `None` when a numeric payload does not parse.
    pub fn from_line(line: ControlLine, payload: &str) -> Option<Self> {
        match line {
            ControlLine::Toggle => Some(Self::RemoteToggle),
            // Literal comparison: "0.0" and "false" both switch the pump on.
            ControlLine::SetActive => Some(Self::SetActive {
                active: payload != "0",
            }),
            ControlLine::SetSpeed => parse_payload(payload).map(|value| Self::SetSpeed { value }),
            ControlLine::SetTargetLevel => {
                parse_payload(payload).map(|signal| Self::SetTargetLevel { signal })
            }
        }
    }
}

/// Parse a locale-independent decimal payload.
///
/// Accepts an optional sign, digits with an optional `.` fraction, and an optional
/// exponent. Surrounding ASCII whitespace is ignored. Words such as `NaN` or
/// `inf` are rejected; an exponent too large for `f64` yields an infinity.
pub fn parse_payload(payload: &str) -> Option<f64> {
    let s = payload.trim_ascii();
    if !is_decimal(s.as_bytes()) {
        return None;
    }
    s.parse::<f64>().ok()
}

fn is_decimal(b: &[u8]) -> bool {
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }
    if mantissa_digits == 0 {
        return false;
    }

    if i < b.len() && matches!(b[i], b'e' | b'E') {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == b.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_names_round_trip() {
        for line in ControlLine::ALL {
            assert_eq!(line.as_str().parse::<ControlLine>().unwrap(), line);
        }
        assert!("Toggle".parse::<ControlLine>().is_err());
        assert!("set_target_level".parse::<ControlLine>().is_err());
    }

    #[test]
    fn payload_accepts_decimal_forms() {
        assert_eq!(parse_payload("50"), Some(50.0));
        assert_eq!(parse_payload("-12.5"), Some(-12.5));
        assert_eq!(parse_payload("+3"), Some(3.0));
        assert_eq!(parse_payload(".5"), Some(0.5));
        assert_eq!(parse_payload("5."), Some(5.0));
        assert_eq!(parse_payload("1e2"), Some(100.0));
        assert_eq!(parse_payload("2.5E-1"), Some(0.25));
        assert_eq!(parse_payload("  7 "), Some(7.0));
    }

    #[test]
    fn payload_rejects_non_numeric() {
        for bad in ["", "abc", "1,5", "NaN", "inf", "-Infinity", "1e", ".", "+", "1.2.3", "0x10"] {
            assert_eq!(parse_payload(bad), None, "payload {bad:?}");
        }
    }

    #[test]
    fn payload_overflow_is_infinite() {
        assert_eq!(parse_payload("1e400"), Some(f64::INFINITY));
    }

    #[test]
    fn set_active_uses_literal_zero() {
        let cmd = |p| Command::from_line(ControlLine::SetActive, p);
        assert_eq!(cmd("0"), Some(Command::SetActive { active: false }));
        assert_eq!(cmd("0.0"), Some(Command::SetActive { active: true }));
        assert_eq!(cmd("false"), Some(Command::SetActive { active: true }));
        assert_eq!(cmd(""), Some(Command::SetActive { active: true }));
    }

    #[test]
    fn unparseable_numeric_payload_yields_no_command() {
        assert_eq!(Command::from_line(ControlLine::SetSpeed, "fast"), None);
        assert_eq!(Command::from_line(ControlLine::SetTargetLevel, ""), None);
    }
}
