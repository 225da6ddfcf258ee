use serde::{Deserialize, Serialize};

use crate::scoreboard::Grid;

/// Glyph table handed to the display sink on every `present` call.
///
/// Row labels run "Shot N" down to "Shot 1" top-to-bottom; shooter
/// columns run "Shooter 1" to "Shooter N" left-to-right, matching the
/// fixed layout of the external table widget.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScoreboardModel {
    pub row_labels: Vec<String>,
    pub shooter_labels: Vec<String>,
    /// Glyph per grid position, same row/column order as the grid.
    pub glyphs: Vec<Vec<String>>,
}

impl ScoreboardModel {
    pub fn from_grid(grid: &Grid) -> Self {
        let rows = grid.rows();
        let columns = grid.columns();

        let row_labels = (0..rows).map(|row| format!("Shot {}", rows - row)).collect();
        let shooter_labels = (1..=columns).map(|col| format!("Shooter {}", col)).collect();

        let glyphs = (0..rows)
            .map(|row| {
                (0..columns)
                    .map(|col| {
                        grid.get(row, col)
                            .map(|cell| cell.glyph().to_string())
                            .unwrap_or_else(|| "-".to_string())
                    })
                    .collect()
            })
            .collect();

        Self {
            row_labels,
            shooter_labels,
            glyphs,
        }
    }
}

/// Presentation adapter owning all mutable display state.
///
/// The store is the only caller; sinks schedule their own redraws and
/// must not feed state back into the core.
pub trait DisplaySink {
    fn show(&mut self, model: &ScoreboardModel);
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::Cell;

    #[test]
    fn model_labels_follow_fixed_layout() {
        let grid = Grid::new(4, 5);
        let model = ScoreboardModel::from_grid(&grid);
        assert_eq!(model.row_labels, vec!["Shot 4", "Shot 3", "Shot 2", "Shot 1"]);
        assert_eq!(model.shooter_labels.first().map(String::as_str), Some("Shooter 1"));
        assert_eq!(model.shooter_labels.last().map(String::as_str), Some("Shooter 5"));
    }

    #[test]
    fn model_glyphs_mirror_grid_cells() {
        let mut grid = Grid::new(2, 2);
        grid.set(0, 1, Cell::Hit);
        grid.set(1, 0, Cell::Miss);
        let model = ScoreboardModel::from_grid(&grid);
        assert_eq!(model.glyphs[0], vec!["-", "◯"]);
        assert_eq!(model.glyphs[1], vec!["✕", "-"]);
    }

    #[test]
    fn model_is_deterministic_for_equal_grids() {
        let mut grid = Grid::new(3, 3);
        grid.set(2, 2, Cell::Hit);
        assert_eq!(
            ScoreboardModel::from_grid(&grid),
            ScoreboardModel::from_grid(&grid)
        );
    }
}
