//! Film development timer.
//!
//! Computes Develop, Stop and Fix durations from developing time and
//! temperature, then counts each stage up second by second, telling the user
//! when to pour, agitate and drain.

pub mod awake;
pub mod calculator;
pub mod config;
pub mod cue;
pub mod driver;
pub mod error;
pub mod format;
pub mod guard;
pub mod hooks;
pub mod render;
pub mod session;
pub mod timer;

pub use calculator::{Process, ProcessStage, StageSequence, compute_stages};
pub use error::{Error, Result};
pub use format::format_duration;
pub use session::Session;
pub use timer::{Action, Stage, StageTimer, compute_action};
