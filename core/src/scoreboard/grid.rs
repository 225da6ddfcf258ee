use serde::{Deserialize, Serialize};

/// State of one scoreboard position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Hit,
    Miss,
}

impl Cell {
    /// Literal glyphs shared by the display table and the CSV export.
    pub fn glyph(&self) -> &'static str {
        match self {
            Cell::Empty => "-",
            Cell::Hit => "◯",
            Cell::Miss => "✕",
        }
    }
}

/// One fully-assigned scoreboard snapshot.
///
/// Row 0 is the topmost board row on screen, column 0 the leftmost.
/// Dimensions are fixed for the session; every cell starts `Empty`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        if row < self.rows && column < self.columns {
            Some(self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, column: usize, cell: Cell) {
        if row < self.rows && column < self.columns {
            self.cells[row * self.columns + column] = cell;
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_grid_is_fully_empty() {
        let grid = Grid::new(4, 5);
        assert_eq!(grid.cells().len(), 20);
        assert!(grid.cells().iter().all(|cell| *cell == Cell::Empty));
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut grid = Grid::new(2, 3);
        grid.set(1, 2, Cell::Hit);
        assert_eq!(grid.get(1, 2), Some(Cell::Hit));
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn glyphs_match_display_contract() {
        assert_eq!(Cell::Empty.glyph(), "-");
        assert_eq!(Cell::Hit.glyph(), "◯");
        assert_eq!(Cell::Miss.glyph(), "✕");
    }
}
