//! Vectorized environment backends and wrappers.
//!
//! Provides:
//! - `Serial` - Sequential execution for single-environment runs
//! - `Parallel` - Parallel execution using rayon
//! - `VecNormalize` - Observation/reward normalization wrapper
//! - `VecFrameStack` - Rolling observation history wrapper

mod frame_stack;
mod normalize;
mod parallel;
mod serial;
mod vecenv;

pub use frame_stack::VecFrameStack;
pub use normalize::{NormalizeState, VecNormalize};
pub use parallel::Parallel;
pub use serial::Serial;
pub use vecenv::{BoxedVecEnv, VecEnvBackend, VecEnvResult};
