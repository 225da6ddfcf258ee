use boardcore::scoreboard::{Grid, ScoreboardModel};
use serde::{Deserialize, Serialize};

/// State served to the visualizer: the rendered glyph table plus the
/// grid snapshot backing it and the last round's bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BridgeModel {
    pub scoreboard: ScoreboardModel,
    pub grid: Option<Grid>,
    pub assigned: usize,
    pub unassigned: usize,
    pub notes: Vec<String>,
}
