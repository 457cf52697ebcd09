use crate::de::lenient_f64;
use serde::{Deserialize, Serialize};

/// Absolute position and size of an element on its page.
///
/// Page builders frequently persist geometry as strings, so every field
/// accepts either a JSON number or a numeric string. Anything else reads as `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the same rect moved to a new vertical offset. `x` never changes.
    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    /// The `y` at which a sibling stacked directly below this rect starts.
    pub fn next_y(&self, gap: f64) -> f64 {
        self.y + self.height + gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numeric_strings() {
        let rect: Rect =
            serde_json::from_value(json!({ "x": "10", "y": 20, "width": "3.5", "height": "abc" }))
                .unwrap();
        assert_eq!(rect, Rect::new(10.0, 20.0, 3.5, 0.0));
    }

    #[test]
    fn next_y_adds_height_and_gap() {
        let rect = Rect::new(0.0, 100.0, 50.0, 20.0);
        assert_eq!(rect.next_y(5.0), 125.0);
        assert_eq!(rect.with_y(125.0).x, 0.0);
    }
}
