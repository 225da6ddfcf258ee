pub mod detection;
pub mod payload;

pub use detection::{BoundingBox, Detection, Mark, Point};
pub use payload::{FrameAncillary, FramePayload};
