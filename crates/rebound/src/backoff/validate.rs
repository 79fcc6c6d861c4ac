//! Construction-time parameter checks shared by the strategies.
//!
//! Every check runs before a strategy value exists, so an invalid parameter
//! can never surface on a later `next_backoff` call.

use crate::error::{BackoffError, Result};

/// Largest integer an `f64` represents exactly (2^53 − 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

const NON_NEGATIVE: &str = "a finite number >= 0";
const NON_NEGATIVE_OR_INFINITY: &str = "a number >= 0 (infinity allowed)";
const SAFE_INTEGER: &str = "an integer between 0 and 2^53 - 1";

/// A delay-like parameter: finite and non-negative.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BackoffError::InvalidParameter {
            name,
            value,
            expected: NON_NEGATIVE,
        })
    }
}

/// A cap: non-negative, not NaN, may be positive infinity.
pub(crate) fn cap(value: f64) -> Result<f64> {
    if !value.is_nan() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BackoffError::InvalidParameter {
            name: "cap",
            value,
            expected: NON_NEGATIVE_OR_INFINITY,
        })
    }
}

/// An integer-typed parameter: a safe, non-negative integer.
pub(crate) fn safe_integer(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_SAFE_INTEGER {
        Ok(value)
    } else {
        Err(BackoffError::InvalidParameter {
            name,
            value,
            expected: SAFE_INTEGER,
        })
    }
}

/// `cap` must not be below the starting delay.
pub(crate) fn cap_at_least(cap: f64, base_name: &'static str, base: f64) -> Result<()> {
    if cap < base {
        return Err(BackoffError::CapBelowBase {
            cap,
            base_name,
            base,
        });
    }
    Ok(())
}

pub(crate) fn required(name: &'static str, value: Option<f64>) -> Result<f64> {
    value.ok_or(BackoffError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, true)]
    #[case(250.5, true)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_non_negative(#[case] value: f64, #[case] ok: bool) {
        assert_eq!(non_negative("delay", value).is_ok(), ok);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(f64::INFINITY, true)]
    #[case(-0.5, false)]
    #[case(f64::NAN, false)]
    fn test_cap(#[case] value: f64, #[case] ok: bool) {
        assert_eq!(cap(value).is_ok(), ok);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(100.0, true)]
    #[case(MAX_SAFE_INTEGER, true)]
    #[case(MAX_SAFE_INTEGER + 2.0, false)]
    #[case(1.5, false)]
    #[case(-3.0, false)]
    #[case(f64::INFINITY, false)]
    #[case(f64::NAN, false)]
    fn test_safe_integer(#[case] value: f64, #[case] ok: bool) {
        assert_eq!(safe_integer("base", value).is_ok(), ok);
    }

    #[test]
    fn test_error_carries_value_and_constraint() {
        let err = safe_integer("base", 1.5).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("1.5"), "{msg}");
        assert!(msg.contains(SAFE_INTEGER), "{msg}");
    }

    #[test]
    fn test_cap_at_least() {
        assert!(cap_at_least(100.0, "base", 100.0).is_ok());
        assert_eq!(
            cap_at_least(50.0, "base", 100.0),
            Err(BackoffError::CapBelowBase {
                cap: 50.0,
                base_name: "base",
                base: 100.0,
            })
        );
    }
}
