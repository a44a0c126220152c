//! Serial (sequential) vectorization backend.
//!
//! Runs environments one at a time in the calling thread. Selected by the
//! factory for single-environment configurations.

use super::vecenv::{VecEnvBackend, VecEnvResult};
use crate::env::{Env, EnvInfo};
use crate::spaces::Space;
use crate::{OcenvError, Result};
use ndarray::{Array2, ArrayD, IxDyn};

/// Serial vectorization backend
pub struct Serial<E: Env> {
    /// Owned environments, in rank order
    envs: Vec<E>,
    /// Cached flattened observation size
    obs_dim: usize,
    /// Cached spaces
    obs_space: Space,
    action_space: Space,
}

impl<E: Env> Serial<E> {
    /// Build `num_envs` environments from a rank-indexed creator.
    ///
    /// Construction failures propagate; no environments survive a failed
    /// build.
    pub fn new<F>(make: F, num_envs: usize) -> Result<Self>
    where
        F: Fn(usize) -> Result<E>,
    {
        if num_envs == 0 {
            return Err(OcenvError::ConfigError(
                "at least one environment is required".to_string(),
            ));
        }

        let mut envs = Vec::with_capacity(num_envs);
        for rank in 0..num_envs {
            envs.push(make(rank)?);
        }

        let obs_space = envs[0].observation_space();
        let action_space = envs[0].action_space();
        let obs_dim = obs_space.flat_dim();

        Ok(Self {
            envs,
            obs_dim,
            obs_space,
            action_space,
        })
    }
}

impl<E: Env> VecEnvBackend for Serial<E> {
    fn observation_space(&self) -> Space {
        self.obs_space.clone()
    }

    fn action_space(&self) -> Space {
        self.action_space.clone()
    }

    fn num_envs(&self) -> usize {
        self.envs.len()
    }

    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, Vec<EnvInfo>) {
        let mut observations = Vec::with_capacity(self.envs.len() * self.obs_dim);
        let mut infos = Vec::with_capacity(self.envs.len());

        for (i, env) in self.envs.iter_mut().enumerate() {
            let env_seed = seed.map(|s| s + i as u64);
            let (obs, info) = env.reset(env_seed);
            observations.extend(obs.into_iter());
            infos.push(info);
        }

        let obs_array = Array2::from_shape_vec((self.envs.len(), self.obs_dim), observations)
            .expect("observation size mismatch across environments");

        (obs_array, infos)
    }

    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        let num_envs = self.envs.len();
        let mut observations = Vec::with_capacity(num_envs * self.obs_dim);
        let mut rewards = Vec::with_capacity(num_envs);
        let mut terminated = Vec::with_capacity(num_envs);
        let mut truncated = Vec::with_capacity(num_envs);
        let mut infos = Vec::with_capacity(num_envs);

        for (i, env) in self.envs.iter_mut().enumerate() {
            let action_row = actions.row(i);
            let action = ArrayD::from_shape_vec(IxDyn(&[action_row.len()]), action_row.to_vec())
                .expect("action row copy cannot fail");

            // Finished environments restart instead of stepping
            if env.is_done() {
                let (obs, info) = env.reset(None);
                observations.extend(obs.into_iter());
                rewards.push(0.0);
                terminated.push(false);
                truncated.push(false);
                infos.push(info);
            } else {
                let result = env.step(&action);
                observations.extend(result.observation.into_iter());
                rewards.push(result.reward);
                terminated.push(result.terminated);
                truncated.push(result.truncated);
                infos.push(result.info);
            }
        }

        let obs_array = Array2::from_shape_vec((num_envs, self.obs_dim), observations)
            .expect("observation size mismatch across environments");

        VecEnvResult {
            observations: obs_array,
            rewards,
            terminated,
            truncated,
            infos,
        }
    }

    fn close(&mut self) {
        for env in &mut self.envs {
            env.close();
        }
    }
}
