use std::sync::Arc;

use crate::workflow::config::WorkflowConfig;
use boardcore::assign::RankPartition;
use boardcore::frame::{Detection, FramePayload};
use boardcore::prelude::AssignStrategy;
use boardcore::scoreboard::Grid;

pub struct RoundResult {
    pub grid: Grid,
    /// Detections written into the grid after confidence filtering.
    pub assigned: usize,
    /// Detections the fixed-size partition could not place.
    pub unassigned: usize,
    pub notes: Vec<String>,
}

/// Runs one frame through the confidence filter and the grid assigner.
///
/// Confidence thresholding belongs to the frame source side of the
/// contract, so it happens here and never inside the assignment
/// strategy.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    strategy: Arc<dyn AssignStrategy + Send + Sync>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self::with_strategy(config, Arc::new(RankPartition::new()))
    }

    pub fn with_strategy(
        config: WorkflowConfig,
        strategy: Arc<dyn AssignStrategy + Send + Sync>,
    ) -> Self {
        Self { config, strategy }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn execute(&self, payload: &FramePayload) -> anyhow::Result<RoundResult> {
        let session = self.config.to_session_config();

        let kept: Vec<Detection> = payload
            .detections
            .iter()
            .filter(|det| det.confidence >= session.confidence)
            .cloned()
            .collect();

        let assignment = self.strategy.assign(&kept, &session);
        let assigned = kept.len() - assignment.unassigned;

        let mut notes = vec![format!(
            "kept {} of {} detections above confidence {:.2}",
            kept.len(),
            payload.detections.len(),
            session.confidence
        )];
        if assignment.unassigned > 0 {
            notes.push(format!(
                "{} detections left unassigned by the partition",
                assignment.unassigned
            ));
        }

        Ok(RoundResult {
            grid: assignment.grid,
            assigned,
            unassigned: assignment.unassigned,
            notes,
        })
    }
}
