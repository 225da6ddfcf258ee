pub mod export;
pub mod grid;
pub mod model;
pub mod store;

pub use export::{CsvExporter, ExportRecord};
pub use grid::{Cell, Grid};
pub use model::{DisplaySink, ScoreboardModel};
pub use store::ScoreboardStore;
