use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::prelude::BoardResult;
use crate::scoreboard::{Cell, Grid};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Wall-clock stamp shared by every record of one export call.
pub fn export_timestamp() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// One durable row: one shooter's shot sequence at export time.
/// Records are append-only and never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRecord {
    pub timestamp: String,
    pub shooter: String,
    /// Chronological order: `shots[0]` is shot 1, read from the bottom
    /// grid row.
    pub shots: Vec<Cell>,
}

impl ExportRecord {
    /// Reads one shooter column out of the grid, inverting the grid's
    /// top-to-bottom storage into shot order.
    pub fn from_column(grid: &Grid, column: usize, timestamp: &str) -> Self {
        let rows = grid.rows();
        let shots = (1..=rows)
            .map(|shot| grid.get(rows - shot, column).unwrap_or(Cell::Empty))
            .collect();
        Self {
            timestamp: timestamp.to_string(),
            shooter: format!("Shooter {}", column + 1),
            shots,
        }
    }

    fn to_csv_line(&self) -> String {
        let mut fields = vec![self.timestamp.clone(), self.shooter.clone()];
        fields.extend(self.shots.iter().map(|cell| cell.glyph().to_string()));
        fields.join(",")
    }
}

/// Append-only CSV store for exported rounds.
pub struct CsvExporter {
    path: PathBuf,
    num_shots: usize,
}

impl CsvExporter {
    /// Opens the store, writing the header first if the file does not
    /// exist yet. Subsequent runs append below the existing header.
    pub fn new(path: impl AsRef<Path>, num_shots: usize) -> BoardResult<Self> {
        let exporter = Self {
            path: path.as_ref().to_path_buf(),
            num_shots,
        };
        if !exporter.path.exists() {
            if let Some(parent) = exporter.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&exporter.path)?;
            file.write_all(exporter.header_line().as_bytes())?;
        }
        Ok(exporter)
    }

    fn header_line(&self) -> String {
        let mut fields = vec!["Timestamp".to_string(), "Shooter".to_string()];
        fields.extend((1..=self.num_shots).map(|shot| format!("Shot{}", shot)));
        format!("{}\n", fields.join(","))
    }

    pub fn append(&self, records: &[ExportRecord]) -> BoardResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for record in records {
            file.write_all(record.to_csv_line().as_bytes())?;
            file.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
