//! Vectorized environment abstraction.

use crate::env::EnvInfo;
use crate::spaces::Space;
use ndarray::Array2;

/// Result from stepping all environments
#[derive(Clone, Debug)]
pub struct VecEnvResult {
    /// Observations for all environments, one row per env
    pub observations: Array2<f32>,
    /// Rewards for all environments
    pub rewards: Vec<f32>,
    /// Terminated flags
    pub terminated: Vec<bool>,
    /// Truncated flags
    pub truncated: Vec<bool>,
    /// Info for each environment
    pub infos: Vec<EnvInfo>,
}

impl VecEnvResult {
    /// Check which environments are done
    pub fn dones(&self) -> Vec<bool> {
        self.terminated
            .iter()
            .zip(self.truncated.iter())
            .map(|(&t, &tr)| t || tr)
            .collect()
    }
}

/// Trait for vectorized environment backends
pub trait VecEnvBackend: Send {
    /// Get the observation space (single env)
    fn observation_space(&self) -> Space;

    /// Get the action space (single env)
    fn action_space(&self) -> Space;

    /// Get the number of environments
    fn num_envs(&self) -> usize;

    /// Reset all environments
    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, Vec<EnvInfo>);

    /// Step all environments with given actions (one row per env)
    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult;

    /// Close all environments
    fn close(&mut self);
}

/// Opaque handle to a fully wrapped vectorized environment.
///
/// The factory returns this type so callers hold one uniform handle
/// regardless of the container and wrapper combination underneath.
pub type BoxedVecEnv = Box<dyn VecEnvBackend>;

impl std::fmt::Debug for dyn VecEnvBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecEnvBackend")
            .field("num_envs", &self.num_envs())
            .finish_non_exhaustive()
    }
}

impl<B: VecEnvBackend + ?Sized> VecEnvBackend for Box<B> {
    fn observation_space(&self) -> Space {
        (**self).observation_space()
    }

    fn action_space(&self) -> Space {
        (**self).action_space()
    }

    fn num_envs(&self) -> usize {
        (**self).num_envs()
    }

    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, Vec<EnvInfo>) {
        (**self).reset(seed)
    }

    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        (**self).step(actions)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
