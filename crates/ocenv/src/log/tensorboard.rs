//! TensorBoard logging backend.

use super::MetricLogger;
use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Logger that writes to TensorBoard event files.
pub struct TensorBoardLogger {
    writer: Mutex<SummaryWriter>,
}

impl TensorBoardLogger {
    /// Open a writer rooted at `log_dir`, creating the directory if
    /// needed. Failure to create the directory is fatal to the run.
    pub fn create(log_dir: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(log_dir.as_ref())?;
        let writer = SummaryWriter::new(log_dir.as_ref());
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl MetricLogger for TensorBoardLogger {
    fn log_scalar(&self, name: &str, value: f64, step: u64) {
        if let Ok(mut writer) = self.writer.lock() {
            writer.add_scalar(name, value as f32, step as usize);
            let _ = writer.flush();
        }
    }

    fn log_metrics(&self, metrics: &HashMap<String, f64>, step: u64) {
        if let Ok(mut writer) = self.writer.lock() {
            for (name, value) in metrics {
                writer.add_scalar(name, *value as f32, step as usize);
            }
            let _ = writer.flush();
        }
    }

    fn close(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
