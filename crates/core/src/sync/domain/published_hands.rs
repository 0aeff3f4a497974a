//! Reader side of the published wire shape: turns `hands_data` and
//! `handedness` back into typed hands for consumers of the model.

use serde_json::Value;

use crate::tracking::domain::columnar_hand::ColumnarHand;
use crate::tracking::domain::handedness::Handedness;

use super::reactive_model::{keys, ReactiveModel};

/// A published hand together with its handedness, if one was published.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledHand {
    pub hand: ColumnarHand,
    pub handedness: Option<Handedness>,
}

/// All published hands, or `None` while `hands_data` is absent.
pub fn read_hands(
    model: &dyn ReactiveModel,
) -> Result<Option<Vec<LabeledHand>>, serde_json::Error> {
    let hands: Vec<ColumnarHand> = match model.get(keys::HANDS_DATA) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => serde_json::from_value(value)?,
    };
    let handedness: Vec<Handedness> = match model.get(keys::HANDEDNESS) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value)?,
    };

    let mut labels = handedness.into_iter();
    Ok(Some(
        hands
            .into_iter()
            .map(|hand| LabeledHand {
                hand,
                handedness: labels.next(),
            })
            .collect(),
    ))
}

/// The first published hand, if any.
pub fn read_first_hand(
    model: &dyn ReactiveModel,
) -> Result<Option<LabeledHand>, serde_json::Error> {
    Ok(read_hands(model)?.and_then(|hands| hands.into_iter().next()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::infrastructure::in_memory_model::InMemoryModel;
    use serde_json::json;

    fn column(v: f64) -> Vec<f64> {
        vec![v; 21]
    }

    fn model_with(hands: Value, handedness: Value) -> InMemoryModel {
        InMemoryModel::with_values([
            (keys::HANDS_DATA.to_string(), hands),
            (keys::HANDEDNESS.to_string(), handedness),
        ])
    }

    #[test]
    fn test_absent_hands_read_as_none() {
        let model = model_with(Value::Null, Value::Null);
        assert_eq!(read_hands(&model).unwrap(), None);
        assert_eq!(read_first_hand(&model).unwrap(), None);

        assert_eq!(read_hands(&InMemoryModel::new()).unwrap(), None);
    }

    #[test]
    fn test_hands_zipped_with_handedness() {
        let model = model_with(
            json!([
                {"x": column(0.5), "y": column(0.4), "z": column(0.0)},
                {"x": column(0.1), "y": column(0.2), "z": column(0.3)}
            ]),
            json!([["Right", 0.92], ["Left", 0.81]]),
        );

        let hands = read_hands(&model).unwrap().unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].hand.x[0], 0.5);
        assert_eq!(hands[0].handedness, Some(Handedness("Right".into(), 0.92)));
        assert_eq!(hands[1].handedness.as_ref().unwrap().label(), "Left");
    }

    #[test]
    fn test_missing_handedness_leaves_labels_empty() {
        let model = model_with(
            json!([{"x": column(0.5), "y": column(0.4), "z": column(0.0)}]),
            Value::Null,
        );
        let first = read_first_hand(&model).unwrap().unwrap();
        assert!(first.handedness.is_none());
    }

    #[test]
    fn test_malformed_hands_are_an_error() {
        let model = model_with(json!([{"x": "oops"}]), Value::Null);
        assert!(read_hands(&model).is_err());
    }
}
