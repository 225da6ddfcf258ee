use crate::frame::{Detection, Mark, Point};
use crate::prelude::{AssignStrategy, Assignment, SessionConfig};
use crate::scoreboard::{Cell, Grid};
use crate::telemetry::log::LogManager;

/// Default assignment strategy: rank-based fixed-size partition.
///
/// Shots accumulate visually from the bottom of the board upward, so the
/// strategy substitutes vertical rank for temporal order: sort every
/// center by `cy` descending, slice the sorted list into consecutive
/// groups of `num_targets`, and write group `i` into grid row
/// `num_shots - i - 1`. Within a group, `cx` descending rank maps
/// right-to-left onto columns. Both inversions match the external
/// display and export layout and must stay as they are.
pub struct RankPartition {
    logger: LogManager,
}

impl RankPartition {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }
}

impl Default for RankPartition {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignStrategy for RankPartition {
    fn assign(&self, detections: &[Detection], config: &SessionConfig) -> Assignment {
        let mut grid = Grid::new(config.num_shots, config.num_targets);

        let mut points: Vec<Point> = detections.iter().map(Point::from_detection).collect();
        if points.is_empty() {
            return Assignment {
                grid,
                unassigned: 0,
            };
        }

        // Bottom of frame first; stable so ties keep input order.
        points.sort_by(|a, b| b.cy.cmp(&a.cy));

        let mut assigned = 0usize;
        for group_index in 0..config.num_shots {
            let start = group_index * config.num_targets;
            let end = start + config.num_targets;
            if end > points.len() {
                // A short trailing group is dropped whole, never
                // partially written into its row.
                break;
            }

            let mut group: Vec<Point> = points[start..end].to_vec();
            group.sort_by(|a, b| b.cx.cmp(&a.cx));

            let row = config.num_shots - group_index - 1;
            for (rank, point) in group.iter().enumerate() {
                let col = config.num_targets - rank - 1;
                let cell = match point.mark {
                    Mark::Hit => Cell::Hit,
                    Mark::Miss => Cell::Miss,
                    Mark::Unknown => Cell::Empty,
                };
                grid.set(row, col, cell);
            }
            assigned += config.num_targets;
        }

        let unassigned = points.len() - assigned;
        if unassigned > 0 {
            self.logger.record_warning(&format!(
                "RankPartition left {} of {} detections unassigned",
                unassigned,
                points.len()
            ));
        }

        Assignment { grid, unassigned }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::BoundingBox;

    fn detection_at(cx: i32, cy: i32, label: &str) -> Detection {
        Detection::new(label, BoundingBox::new(cx - 10, cy - 10, cx + 10, cy + 10), 0.9)
    }

    fn config(shots: usize, targets: usize) -> SessionConfig {
        SessionConfig {
            num_shots: shots,
            num_targets: targets,
            ..Default::default()
        }
    }

    /// Builds one detection per cell of `pattern`, placing row 0 at the
    /// top of the frame and column 0 at the left, the way the camera
    /// sees the board.
    fn layout(pattern: &[&[&str]]) -> Vec<Detection> {
        let mut detections = Vec::new();
        for (row, labels) in pattern.iter().enumerate() {
            for (col, label) in labels.iter().enumerate() {
                let cx = 100 + 120 * col as i32;
                let cy = 80 + 100 * row as i32;
                detections.push(detection_at(cx, cy, label));
            }
        }
        detections
    }

    #[test]
    fn empty_input_yields_all_empty_grid() {
        let strategy = RankPartition::new();
        let cfg = config(4, 5);
        let result = strategy.assign(&[], &cfg);
        assert_eq!(result.grid.rows(), 4);
        assert_eq!(result.grid.columns(), 5);
        assert_eq!(result.unassigned, 0);
        assert!(result
            .grid
            .cells()
            .iter()
            .all(|cell| *cell == Cell::Empty));
    }

    #[test]
    fn perfect_layout_round_trips_after_scrambling() {
        let strategy = RankPartition::new();
        let cfg = config(4, 5);
        let pattern: &[&[&str]] = &[
            &["O", "X", "O", "X", "O"],
            &["X", "X", "O", "O", "X"],
            &["O", "O", "O", "X", "X"],
            &["X", "O", "X", "O", "O"],
        ];
        let mut detections = layout(pattern);
        // Scramble the input order; assignment must not depend on it.
        detections.reverse();
        detections.swap(3, 11);
        detections.swap(0, 17);

        let result = strategy.assign(&detections, &cfg);
        assert_eq!(result.unassigned, 0);
        for (row, labels) in pattern.iter().enumerate() {
            for (col, label) in labels.iter().enumerate() {
                let expected = if *label == "O" { Cell::Hit } else { Cell::Miss };
                assert_eq!(result.grid.get(row, col), Some(expected), "row {row} col {col}");
            }
        }
    }

    #[test]
    fn short_trailing_group_is_dropped_whole() {
        let strategy = RankPartition::new();
        let cfg = config(4, 5);
        let pattern: &[&[&str]] = &[
            &["O", "O", "O", "O", "O"],
            &["X", "X", "X", "X", "X"],
            &["O", "O", "O", "O", "O"],
            &["X", "X", "X", "X", "X"],
        ];
        let mut detections = layout(pattern);
        // 17 of 20 points: the topmost row loses 3 marks, so its whole
        // group falls short and stays Empty.
        detections.drain(0..3);

        let result = strategy.assign(&detections, &cfg);
        assert_eq!(result.unassigned, 2);
        for col in 0..5 {
            assert_eq!(result.grid.get(0, col), Some(Cell::Empty));
        }
        for (row, expected) in [(1, Cell::Miss), (2, Cell::Hit), (3, Cell::Miss)] {
            for col in 0..5 {
                assert_eq!(result.grid.get(row, col), Some(expected), "row {row} col {col}");
            }
        }
    }

    #[test]
    fn excess_detections_are_ignored_and_counted() {
        let strategy = RankPartition::new();
        let cfg = config(2, 2);
        let pattern: &[&[&str]] = &[&["O", "X"], &["X", "O"]];
        let mut detections = layout(pattern);
        // Extra marks above the board; they sort last and never fit a group.
        detections.push(detection_at(50, 10, "O"));
        detections.push(detection_at(170, 5, "X"));

        let result = strategy.assign(&detections, &cfg);
        assert_eq!(result.unassigned, 2);
        assert_eq!(result.grid.get(0, 0), Some(Cell::Hit));
        assert_eq!(result.grid.get(0, 1), Some(Cell::Miss));
        assert_eq!(result.grid.get(1, 0), Some(Cell::Miss));
        assert_eq!(result.grid.get(1, 1), Some(Cell::Hit));
    }

    #[test]
    fn unrecognized_labels_leave_cells_empty() {
        let strategy = RankPartition::new();
        let cfg = config(1, 3);
        let pattern: &[&[&str]] = &[&["O", "smudge", "X"]];
        let result = strategy.assign(&layout(pattern), &cfg);
        assert_eq!(result.grid.get(0, 0), Some(Cell::Hit));
        assert_eq!(result.grid.get(0, 1), Some(Cell::Empty));
        assert_eq!(result.grid.get(0, 2), Some(Cell::Miss));
        assert_eq!(result.unassigned, 0);
    }

    #[test]
    fn confidence_never_influences_placement() {
        let strategy = RankPartition::new();
        let cfg = config(1, 2);
        let mut low = layout(&[&["O", "X"]]);
        for det in &mut low {
            det.confidence = 0.01;
        }
        let high = layout(&[&["O", "X"]]);
        assert_eq!(
            strategy.assign(&low, &cfg).grid,
            strategy.assign(&high, &cfg).grid
        );
    }
}
