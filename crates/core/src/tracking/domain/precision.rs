//! Decimal rounding of published coordinates.
//!
//! Rounding goes through [`Round`], which is implemented for scalars and for
//! every composite the pipeline publishes, so a whole value tree is rounded
//! in one call and non-numeric leaves pass through untouched.

use serde_json::{Number, Value};

use crate::shared::constants::{DEFAULT_PRECISION, MAX_PRECISION};
use crate::shared::error::PipelineError;
use crate::shared::hand::{Hand, Point3};

/// f64 carries ~15-17 significant digits; scaling past this only adds noise.
const MAX_EFFECTIVE_DIGITS: u32 = 15;

/// Scaled magnitudes from here on are returned unchanged. Below it, scaling
/// a rounded value back up lands within a quarter of the same integer, so a
/// second round reproduces the first.
const MAX_ROUNDABLE_SCALED: f64 = (1u64 << 50) as f64;

/// Number of fractional digits kept when publishing coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    pub fn new(digits: i64) -> Result<Self, PipelineError> {
        if digits < 0 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "precision must be >= 0, got {digits}"
            )));
        }
        if digits > MAX_PRECISION as i64 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "precision must be <= {MAX_PRECISION}, got {digits}"
            )));
        }
        Ok(Self(digits as u32))
    }

    pub fn digits(&self) -> u32 {
        self.0
    }

    /// Rounds half away from zero to `digits` fractional digits.
    ///
    /// Non-finite input, precisions beyond what f64 can hold, and values with
    /// no fractional digits left at this precision are returned unchanged. A
    /// negative zero result is normalized to `0.0`. Rounding a rounded value
    /// returns it as-is.
    pub fn round(&self, value: f64) -> f64 {
        if !value.is_finite() || self.0 > MAX_EFFECTIVE_DIGITS {
            return value;
        }
        let scale = 10f64.powi(self.0 as i32);
        let scaled = value * scale;
        if !scaled.is_finite() || scaled.abs() >= MAX_ROUNDABLE_SCALED {
            return value;
        }
        let rounded = scaled.round() / scale;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(DEFAULT_PRECISION)
    }
}

/// Structure-preserving rounding of every number in a value.
///
/// Implementations never mutate the input and never reorder fields.
pub trait Round {
    fn rounded(&self, precision: Precision) -> Self;
}

impl Round for f64 {
    fn rounded(&self, precision: Precision) -> Self {
        precision.round(*self)
    }
}

impl Round for Point3 {
    fn rounded(&self, precision: Precision) -> Self {
        self.map(|v| precision.round(v))
    }
}

impl Round for Hand {
    fn rounded(&self, precision: Precision) -> Self {
        Hand::new(
            self.landmarks()
                .iter()
                .map(|point| point.rounded(precision))
                .collect(),
        )
    }
}

impl<T: Round> Round for Vec<T> {
    fn rounded(&self, precision: Precision) -> Self {
        self.iter().map(|item| item.rounded(precision)).collect()
    }
}

impl<T: Round> Round for Option<T> {
    fn rounded(&self, precision: Precision) -> Self {
        self.as_ref().map(|inner| inner.rounded(precision))
    }
}

impl Round for Value {
    fn rounded(&self, precision: Precision) -> Self {
        match self {
            Value::Number(n) => round_number(n, precision),
            Value::Array(items) => Value::Array(items.rounded(precision)),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.rounded(precision)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

fn round_number(n: &Number, precision: Precision) -> Value {
    if n.is_i64() || n.is_u64() {
        return Value::Number(n.clone());
    }
    match n.as_f64().and_then(|v| Number::from_f64(precision.round(v))) {
        Some(rounded) => Value::Number(rounded),
        None => Value::Number(n.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use serde_json::json;

    fn p(digits: i64) -> Precision {
        Precision::new(digits).unwrap()
    }

    #[rstest]
    #[case::three_digits(0.123456, 3, 0.123)]
    #[case::half_up(0.0005, 3, 0.001)]
    #[case::half_away_negative(-0.25, 1, -0.3)]
    #[case::zero_digits(2.5, 0, 3.0)]
    #[case::already_short(0.5, 3, 0.5)]
    #[case::large_value(1234.56789, 2, 1234.57)]
    fn test_round_scalar(#[case] value: f64, #[case] digits: i64, #[case] expected: f64) {
        assert_relative_eq!(p(digits).round(value), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_zero_normalized() {
        let r = p(3).round(-0.0001);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }

    #[test]
    fn test_round_is_idempotent() {
        // Deterministic spread over 1e-3..1e4, both signs, irregular mantissas.
        let values: Vec<f64> = (0..2000)
            .map(|i| {
                let i = i as f64;
                let mantissa = (i * 0.618_033_988_749_894_9).fract() + 0.1;
                let exponent = (i * 0.377_964_473).fract() * 7.0 - 3.0;
                let sign = if (i as u64) % 2 == 0 { 1.0 } else { -1.0 };
                sign * mantissa * 10f64.powf(exponent)
            })
            .chain([0.123456, -9.87654321, 0.0005, 1e-9, 42.0, -0.4999, 3.14159265])
            .collect();
        for digits in 0..=MAX_EFFECTIVE_DIGITS as i64 {
            let precision = p(digits);
            for &v in &values {
                let once = precision.round(v);
                assert_eq!(precision.round(once), once, "v={v} digits={digits}");
            }
        }
    }

    #[rstest]
    #[case::twelve_digits(4399.6378560233825, 12)]
    #[case::fourteen_digits(41.064202468342536, 14)]
    #[case::fifteen_digits(-4.264247032739807, 15)]
    fn test_round_is_stable_near_f64_resolution(#[case] value: f64, #[case] digits: i64) {
        let precision = p(digits);
        let once = precision.round(value);
        let twice = precision.round(once);
        assert_eq!(precision.round(twice), twice);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_excess_precision_passes_through() {
        let v = 0.1234567890123456789;
        assert_eq!(p(20).round(v), v);
    }

    #[test]
    fn test_non_finite_passes_through() {
        assert!(p(3).round(f64::NAN).is_nan());
        assert_eq!(p(3).round(f64::INFINITY), f64::INFINITY);
    }

    #[rstest]
    #[case::negative(-1)]
    #[case::too_large(101)]
    fn test_invalid_precision_rejected(#[case] digits: i64) {
        assert!(matches!(
            Precision::new(digits),
            Err(PipelineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_round_hand_rounds_every_axis() {
        let hand = Hand::new(vec![Point3::new(0.12345, -0.98765, 0.00049)]);
        let rounded = hand.rounded(p(3));
        assert_eq!(rounded.landmarks()[0], Point3::new(0.123, -0.988, 0.0));
        assert_eq!(hand.landmarks()[0].x, 0.12345);
    }

    #[test]
    fn test_round_value_tree_preserves_structure() {
        let tree = json!({
            "zeta": [0.12345, "label", {"inner": -1.98765}],
            "alpha": true,
            "count": 7,
            "missing": null
        });
        let rounded = tree.rounded(p(2));
        assert_eq!(
            rounded,
            json!({
                "zeta": [0.12, "label", {"inner": -1.99}],
                "alpha": true,
                "count": 7,
                "missing": null
            })
        );
        let keys: Vec<&String> = rounded.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "count", "missing"]);
    }

    #[test]
    fn test_round_option_and_vec() {
        let values: Option<Vec<f64>> = Some(vec![1.005, 2.0049]);
        assert_eq!(values.rounded(p(2)), Some(vec![1.0, 2.0]));
        let none: Option<Vec<f64>> = None;
        assert_eq!(none.rounded(p(2)), None);
    }
}
