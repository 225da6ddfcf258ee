use std::path::Path;

use crate::prelude::{BoardResult, SessionConfig};
use crate::scoreboard::export::{export_timestamp, CsvExporter, ExportRecord};
use crate::scoreboard::model::{DisplaySink, ScoreboardModel};
use crate::scoreboard::Grid;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;

/// Holds the latest grid's presentation and durable-export concerns.
///
/// The store never mutates a grid: `present` pushes a derived glyph table
/// to the display sink, `export` appends a snapshot to the CSV store.
/// Export failures are reported to the caller and leave both the store
/// and the display usable.
pub struct ScoreboardStore<S: DisplaySink> {
    config: SessionConfig,
    sink: S,
    exporter: CsvExporter,
    metrics: MetricsRecorder,
    logger: LogManager,
    closed: bool,
}

impl<S: DisplaySink> ScoreboardStore<S> {
    /// Fails fast on configuration mismatch or an unusable CSV path;
    /// both are structural startup faults.
    pub fn new(config: SessionConfig, sink: S, csv_path: impl AsRef<Path>) -> BoardResult<Self> {
        config.validate()?;
        let exporter = CsvExporter::new(csv_path, config.num_shots)?;
        Ok(Self {
            config,
            sink,
            exporter,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
            closed: false,
        })
    }

    pub fn present(&mut self, grid: &Grid) {
        if self.closed {
            return;
        }
        let model = ScoreboardModel::from_grid(grid);
        self.sink.show(&model);
        self.metrics.record_presented();
    }

    pub fn export(&mut self, grid: &Grid) -> BoardResult<()> {
        let timestamp = export_timestamp();
        let records: Vec<ExportRecord> = (0..grid.columns())
            .map(|column| ExportRecord::from_column(grid, column, &timestamp))
            .collect();

        match self.exporter.append(&records) {
            Ok(()) => {
                self.metrics.record_exported();
                self.logger.record(&format!(
                    "exported {} records to {}",
                    records.len(),
                    self.exporter.path().display()
                ));
                Ok(())
            }
            Err(err) => {
                self.metrics.record_export_error();
                Err(err)
            }
        }
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.sink.close();
            self.closed = true;
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::Cell;
    use std::sync::{Arc, Mutex};

    /// Test sink capturing every model pushed to it.
    #[derive(Clone, Default)]
    struct CaptureSink {
        shown: Arc<Mutex<Vec<ScoreboardModel>>>,
        closed: Arc<Mutex<usize>>,
    }

    impl DisplaySink for CaptureSink {
        fn show(&mut self, model: &ScoreboardModel) {
            self.shown.lock().unwrap().push(model.clone());
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() += 1;
        }
    }

    fn store_in(dir: &tempfile::TempDir, sink: CaptureSink) -> ScoreboardStore<CaptureSink> {
        ScoreboardStore::new(
            SessionConfig::default(),
            sink,
            dir.path().join("results.csv"),
        )
        .unwrap()
    }

    #[test]
    fn present_is_idempotent_for_equal_grids() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CaptureSink::default();
        let mut store = store_in(&dir, sink.clone());

        let mut grid = Grid::new(4, 5);
        grid.set(3, 0, Cell::Hit);
        store.present(&grid);
        store.present(&grid);

        let shown = sink.shown.lock().unwrap();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0], shown[1]);
    }

    #[test]
    fn export_appends_one_record_per_shooter() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir, CaptureSink::default());

        let grid = Grid::new(4, 5);
        store.export(&grid).unwrap();
        store.export(&grid).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
        // Header plus five shooters per export call.
        assert_eq!(contents.lines().count(), 1 + 5 + 5);
        let (exported, errors) = store.metrics().export_counts();
        assert_eq!((exported, errors), (2, 0));
    }

    #[test]
    fn invalid_config_is_fatal_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            num_shots: 0,
            ..Default::default()
        };
        let result = ScoreboardStore::new(
            config,
            CaptureSink::default(),
            dir.path().join("results.csv"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn close_is_idempotent_and_stops_presentation() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CaptureSink::default();
        let mut store = store_in(&dir, sink.clone());

        store.close();
        store.close();
        store.present(&Grid::new(4, 5));

        assert_eq!(*sink.closed.lock().unwrap(), 1);
        assert!(sink.shown.lock().unwrap().is_empty());
    }
}
