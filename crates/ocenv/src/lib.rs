//! # ocenv
//!
//! Construction helpers for object-centric reinforcement-learning
//! environments, plus a training metrics recorder.
//!
//! ## Overview
//!
//! ocenv provides:
//! - The `Env` trait plus episode-statistics monitoring and an
//!   interface-compatibility checker
//! - Vectorized execution containers (serial and parallel) with
//!   normalization and frame-stacking wrappers
//! - A factory that turns a single typed configuration into ready-to-step
//!   train/eval environment handles
//! - A `Recorder` that forwards episode and optimization-step scalars to a
//!   text log and a TensorBoard sink
//!
//! The heavy lifting (object extraction, Atari emulation) lives behind the
//! [`env::object_centric::EnvProvider`] seam and is supplied by the caller,
//! or by the synthetic environments in `ocenv-envs`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ocenv::prelude::*;
//! use ocenv_envs::SyntheticProvider;
//!
//! let cfg = VecEnvConfig::new("ALE/Pong-v5").object_centric(true);
//! let (mut train_env, mut eval_env) =
//!     build_train_eval(&SyntheticProvider, &cfg, 8, 4, 0, RewardMode::Env, false)?;
//! let (obs, _) = train_env.reset(Some(0));
//! ```

pub mod env;
pub mod factory;
pub mod spaces;
pub mod stats;
pub mod vector;

// Logging and metrics recording
pub mod log;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::env::object_centric::{
        AtariSettings, EnvProvider, OcEnvSettings, RenderMode,
    };
    pub use crate::env::{check_env, Env, EnvInfo, Monitor, StepResult};
    pub use crate::factory::{
        build_train_eval, build_vec_env, eval_seed, focus_file_path, pruned_focus_file_name,
        FocusConfig, RewardMode, VecEnvConfig,
    };
    pub use crate::spaces::Space;
    pub use crate::stats::RunningMeanStd;
    pub use crate::vector::{
        BoxedVecEnv, Parallel, Serial, VecEnvBackend, VecEnvResult, VecFrameStack, VecNormalize,
    };

    // Logging exports
    #[cfg(feature = "tensorboard")]
    pub use crate::log::TensorBoardLogger;
    pub use crate::log::{
        CompositeLogger, ConsoleLogger, EpisodeSummary, MetricLogger, NoOpLogger, Recorder,
        RunContext, StepRecord,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum OcenvError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Environment error: {0}")]
    EnvError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OcenvError>;
