use serde::{Deserialize, Serialize};

use crate::shared::constants::HAND_LANDMARK_COUNT;
use crate::shared::error::PipelineError;
use crate::shared::hand::{Hand, Point3};

/// One hand as parallel per-axis sequences: `x[i]`, `y[i]`, `z[i]` belong
/// to landmark `i`. This is the shape published as `hands_data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnarHand {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl ColumnarHand {
    /// Transposes a detector hand into columns.
    ///
    /// Hands that don't carry exactly [`HAND_LANDMARK_COUNT`] finite points
    /// are rejected rather than truncated or padded.
    pub fn from_hand(hand: &Hand) -> Result<Self, PipelineError> {
        if !hand.is_well_formed() {
            return Err(PipelineError::InvalidDetection(format!(
                "hand has {} landmarks, expected {HAND_LANDMARK_COUNT}",
                hand.len()
            )));
        }
        if let Some(i) = hand.landmarks().iter().position(|p| !p.is_finite()) {
            return Err(PipelineError::InvalidDetection(format!(
                "landmark {i} has a non-finite coordinate"
            )));
        }

        let mut columns = Self {
            x: Vec::with_capacity(HAND_LANDMARK_COUNT),
            y: Vec::with_capacity(HAND_LANDMARK_COUNT),
            z: Vec::with_capacity(HAND_LANDMARK_COUNT),
        };
        for point in hand.landmarks() {
            columns.x.push(point.x);
            columns.y.push(point.y);
            columns.z.push(point.z);
        }
        Ok(columns)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Landmark `i` reassembled as a point.
    pub fn point(&self, i: usize) -> Option<Point3> {
        Some(Point3::new(*self.x.get(i)?, *self.y.get(i)?, *self.z.get(i)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::domain::precision::{Precision, Round};
    use rstest::rstest;

    fn sample_hand() -> Hand {
        Hand::new(
            (0..HAND_LANDMARK_COUNT)
                .map(|i| {
                    let t = i as f64;
                    Point3::new(0.5 + t * 0.01234, 0.4 - t * 0.005, -0.001 * t)
                })
                .collect(),
        )
    }

    #[test]
    fn test_columns_have_21_entries() {
        let columnar = ColumnarHand::from_hand(&sample_hand()).unwrap();
        assert_eq!(columnar.x.len(), HAND_LANDMARK_COUNT);
        assert_eq!(columnar.y.len(), HAND_LANDMARK_COUNT);
        assert_eq!(columnar.z.len(), HAND_LANDMARK_COUNT);
    }

    #[test]
    fn test_columns_preserve_landmark_order() {
        let hand = sample_hand();
        let columnar = ColumnarHand::from_hand(&hand).unwrap();
        for (i, point) in hand.landmarks().iter().enumerate() {
            assert_eq!(columnar.point(i), Some(*point));
        }
    }

    #[test]
    fn test_rounded_hand_columns_match_rounded_points() {
        let precision = Precision::new(3).unwrap();
        let hand = sample_hand();
        let columnar = ColumnarHand::from_hand(&hand.rounded(precision)).unwrap();
        for (i, point) in hand.landmarks().iter().enumerate() {
            assert_eq!(columnar.x[i], precision.round(point.x));
            assert_eq!(columnar.y[i], precision.round(point.y));
            assert_eq!(columnar.z[i], precision.round(point.z));
        }
    }

    #[rstest]
    #[case::empty(0)]
    #[case::short(20)]
    #[case::long(22)]
    fn test_wrong_length_is_invalid_detection(#[case] len: usize) {
        let hand = Hand::new(vec![Point3::new(0.1, 0.2, 0.3); len]);
        let err = ColumnarHand::from_hand(&hand).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDetection(_)));
        assert!(err.to_string().contains(&format!("{len} landmarks")));
    }

    #[test]
    fn test_non_finite_point_is_invalid_detection() {
        let mut points = vec![Point3::new(0.1, 0.2, 0.3); HAND_LANDMARK_COUNT];
        points[4].y = f64::NAN;
        let err = ColumnarHand::from_hand(&Hand::new(points)).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidDetection("landmark 4 has a non-finite coordinate".into())
        );
    }

    #[test]
    fn test_serializes_as_axis_object() {
        let columnar = ColumnarHand::from_hand(&sample_hand()).unwrap();
        let value = serde_json::to_value(&columnar).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["x", "y", "z"]);
        assert_eq!(value["x"].as_array().unwrap().len(), HAND_LANDMARK_COUNT);
    }
}
