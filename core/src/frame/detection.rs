use serde::{Deserialize, Serialize};

/// Classified state of one detected mark on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mark {
    Hit,
    Miss,
    Unknown,
}

impl Mark {
    /// Case-sensitive exact match against the detector's label vocabulary.
    /// Anything outside the recognized set is `Unknown`, never an error.
    pub fn parse(label: &str) -> Self {
        match label {
            "O" | "maru" | "circle" => Mark::Hit,
            "X" | "batsu" | "cross" => Mark::Miss,
            _ => Mark::Unknown,
        }
    }
}

/// Axis-aligned pixel box with `x1 <= x2`, `y1 <= y2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Center via floor division, matching the assignment contract.
    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2).div_euclid(2), (self.y1 + self.y2).div_euclid(2))
    }
}

/// One labeled bounding box emitted by the external recognizer for one frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label: label.into(),
            bbox,
            confidence,
        }
    }

    pub fn mark(&self) -> Mark {
        Mark::parse(&self.label)
    }
}

/// Ephemeral center point used only during assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub cx: i32,
    pub cy: i32,
    pub mark: Mark,
}

impl Point {
    pub fn from_detection(detection: &Detection) -> Self {
        let (cx, cy) = detection.bbox.center();
        Self {
            cx,
            cy,
            mark: detection.mark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_marks_exactly() {
        assert_eq!(Mark::parse("O"), Mark::Hit);
        assert_eq!(Mark::parse("maru"), Mark::Hit);
        assert_eq!(Mark::parse("circle"), Mark::Hit);
        assert_eq!(Mark::parse("X"), Mark::Miss);
        assert_eq!(Mark::parse("batsu"), Mark::Miss);
        assert_eq!(Mark::parse("cross"), Mark::Miss);
    }

    #[test]
    fn unrecognized_labels_are_unknown() {
        assert_eq!(Mark::parse("Maru"), Mark::Unknown);
        assert_eq!(Mark::parse("o"), Mark::Unknown);
        assert_eq!(Mark::parse(""), Mark::Unknown);
        assert_eq!(Mark::parse("arrow"), Mark::Unknown);
    }

    #[test]
    fn center_uses_floor_division() {
        let bbox = BoundingBox::new(0, 0, 5, 3);
        assert_eq!(bbox.center(), (2, 1));
        let odd = BoundingBox::new(-3, -3, 0, 0);
        assert_eq!(odd.center(), (-2, -2));
    }

    #[test]
    fn point_carries_mark_from_label() {
        let det = Detection::new("batsu", BoundingBox::new(10, 10, 30, 30), 0.9);
        let point = Point::from_detection(&det);
        assert_eq!((point.cx, point.cy), (20, 20));
        assert_eq!(point.mark, Mark::Miss);
    }
}
