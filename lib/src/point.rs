use serde::{Deserialize, Serialize};

use crate::error::ReduceError;

/// A point in an ordered 2D series: an ordering coordinate `x` (e.g. a
/// timestamp) and a value coordinate `y`. The reduction core never mutates
/// points and never interprets them beyond these two accessors.
pub trait Point {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl Point for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}

// TimePoint is a single sample of a time-value series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: f64,
    pub value: f64,
}

impl Point for TimePoint {
    fn x(&self) -> f64 {
        self.timestamp
    }

    fn y(&self) -> f64 {
        self.value
    }
}

/// Convert a generic JSON value into an ordered point sequence.
///
/// The value must be a sequence whose elements are either two-element
/// numeric arrays `[x, y]` or objects with numeric `timestamp` and `value`
/// fields. Anything else is a [`ReduceError::Conversion`]; an invalid input
/// never comes back as an empty sequence.
pub fn convert(data: &serde_json::Value) -> Result<Vec<TimePoint>, ReduceError> {
    let elements = data
        .as_array()
        .ok_or_else(|| ReduceError::Conversion("input is not a sequence".to_string()))?;

    elements.iter().map(point_from_value).collect()
}

fn point_from_value(value: &serde_json::Value) -> Result<TimePoint, ReduceError> {
    match value {
        serde_json::Value::Array(pair) => {
            if let [x, y] = pair.as_slice() {
                if let (Some(x), Some(y)) = (x.as_f64(), y.as_f64()) {
                    return Ok(TimePoint {
                        timestamp: x,
                        value: y,
                    });
                }
            }
        }
        serde_json::Value::Object(fields) => {
            let x = fields.get("timestamp").and_then(serde_json::Value::as_f64);
            let y = fields.get("value").and_then(serde_json::Value::as_f64);
            if let (Some(x), Some(y)) = (x, y) {
                return Ok(TimePoint {
                    timestamp: x,
                    value: y,
                });
            }
        }
        _ => {}
    }

    Err(ReduceError::Conversion(format!(
        "could not convert element to point: {}",
        value
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_array_pairs() {
        let data = serde_json::json!([[0.0, 1.5], [1.0, 2.5]]);
        let points = convert(&data).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x(), 0.0);
        assert_eq!(points[1].y(), 2.5);
    }

    #[test]
    fn convert_objects() {
        let data = serde_json::json!([
            {"timestamp": 10.0, "value": 1.1},
            {"timestamp": 11.0, "value": 1.2},
        ]);
        let points = convert(&data).unwrap();
        assert_eq!(
            points,
            vec![
                TimePoint {
                    timestamp: 10.0,
                    value: 1.1
                },
                TimePoint {
                    timestamp: 11.0,
                    value: 1.2
                },
            ]
        );
    }

    #[test]
    fn convert_rejects_non_sequence() {
        let data = serde_json::json!({"timestamp": 1.0, "value": 2.0});
        assert!(matches!(
            convert(&data),
            Err(ReduceError::Conversion(_))
        ));
    }

    #[test]
    fn convert_rejects_deficient_element() {
        let data = serde_json::json!([[0.0, 1.0], {"timestamp": 2.0}, [3.0, 4.0]]);
        assert!(convert(&data).is_err());

        let data = serde_json::json!([[0.0, 1.0], "not a point"]);
        assert!(convert(&data).is_err());
    }
}
