//! Environment traits and wrappers.
//!
//! Provides the core `Env` trait all environments implement, the `Monitor`
//! episode-statistics wrapper, the interface-compatibility checker used by
//! the factory probe, and the provider seam to the external object-centric
//! and Atari libraries.

mod checker;
mod monitor;
pub mod object_centric;
mod traits;

pub use checker::check_env;
pub use monitor::Monitor;
pub use traits::{Env, EnvInfo, StepResult};
