//! Grid-assignment and scoreboard core for the target-board reader.
//!
//! The modules mirror the live pipeline while keeping the positional
//! reasoning pure: a frame of detections goes in, an immutable scoreboard
//! grid comes out, and all display/export state lives behind explicit
//! adapters.

pub mod assign;
pub mod frame;
pub mod prelude;
pub mod scoreboard;
pub mod telemetry;

pub use prelude::{AssignStrategy, Assignment, BoardError, BoardResult, SessionConfig};
