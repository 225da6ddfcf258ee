use serde::{Deserialize, Serialize};

use crate::frame::Detection;
use crate::scoreboard::Grid;

/// Immutable per-session configuration shared by every pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Grid rows; one per shot in a round.
    pub num_shots: usize,
    /// Grid columns; one per shooter on the board.
    pub num_targets: usize,
    /// Minimum detector confidence kept by the frame source.
    pub confidence: f32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_shots: 4,
            num_targets: 5,
            confidence: 0.25,
            frame_width: 1280,
            frame_height: 720,
        }
    }
}

impl SessionConfig {
    /// Structural validation; violations here are startup faults, not
    /// runtime data anomalies.
    pub fn validate(&self) -> BoardResult<()> {
        if self.num_shots == 0 || self.num_targets == 0 {
            return Err(BoardError::InvalidConfig(format!(
                "grid dimensions must be nonzero, got {}x{}",
                self.num_shots, self.num_targets
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(BoardError::InvalidConfig(format!(
                "confidence threshold {} outside [0, 1]",
                self.confidence
            )));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.num_shots * self.num_targets
    }
}

/// Result of one assignment pass over a frame's detections.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub grid: Grid,
    /// Detections left over after the fixed-size partition: the trailing
    /// short group plus anything beyond `num_shots * num_targets`.
    pub unassigned: usize,
}

/// Common error type for the scoreboard core.
#[derive(thiserror::Error, Debug)]
pub enum BoardError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("export I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Trait describing replaceable grid-assignment strategies.
///
/// The default rank-partition strategy infers shot order from vertical
/// position alone; a clustering-based assigner can be substituted without
/// touching the `Grid`/`Cell` contract.
pub trait AssignStrategy {
    fn assign(&self, detections: &[Detection], config: &SessionConfig) -> Assignment;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let config = SessionConfig {
            num_targets: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BoardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let config = SessionConfig {
            confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
