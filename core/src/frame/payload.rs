use serde::{Deserialize, Serialize};

use crate::frame::Detection;

/// Ancillary metadata accompanying each captured frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameAncillary {
    pub timestamp: f64,
    pub frame_width: u32,
    pub frame_height: u32,
}

/// One frame's worth of detections as handed over by the frame source.
///
/// Detections carry no ordering guarantee and no identity across frames;
/// the assignment stage recomputes the whole grid from each payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FramePayload {
    pub detections: Vec<Detection>,
    pub ancillary: FrameAncillary,
}

impl FramePayload {
    pub fn new(detections: Vec<Detection>, ancillary: FrameAncillary) -> Self {
        Self {
            detections,
            ancillary,
        }
    }
}
