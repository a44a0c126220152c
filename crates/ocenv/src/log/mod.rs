//! Metrics logging and recording.
//!
//! Provides:
//! - `MetricLogger` trait for composable scalar backends
//! - `ConsoleLogger` for lightweight tracing output
//! - `TensorBoardLogger` for visualization (optional)
//! - `CompositeLogger` for multi-backend logging
//! - `Recorder` for per-episode and per-step training metrics

mod console;
mod logger;
mod recorder;
#[cfg(feature = "tensorboard")]
mod tensorboard;

pub use console::ConsoleLogger;
pub use logger::{CompositeLogger, MetricLogger, NoOpLogger};
pub use recorder::{EpisodeSummary, Recorder, RunContext, StepRecord};
#[cfg(feature = "tensorboard")]
pub use tensorboard::TensorBoardLogger;
