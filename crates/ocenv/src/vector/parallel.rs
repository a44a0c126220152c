//! Parallel vectorization backend.
//!
//! Environments are constructed and stepped on the rayon pool: a fixed set
//! of workers, each step a synchronous fan-out/fan-in over all
//! environments. Every environment is owned by exactly one task per step.

use super::vecenv::{VecEnvBackend, VecEnvResult};
use crate::env::{Env, EnvInfo};
use crate::spaces::Space;
use crate::{OcenvError, Result};
use ndarray::{Array2, ArrayD, IxDyn};
use rayon::prelude::*;

/// Parallel vectorization backend using rayon
pub struct Parallel<E: Env> {
    /// Owned environments, in rank order
    envs: Vec<E>,
    /// Cached flattened observation size
    obs_dim: usize,
    /// Cached spaces
    obs_space: Space,
    action_space: Space,
}

impl<E: Env> Parallel<E> {
    /// Build `num_envs` environments from a rank-indexed creator, in
    /// parallel.
    ///
    /// Construction failures propagate; no environments survive a failed
    /// build.
    pub fn new<F>(make: F, num_envs: usize) -> Result<Self>
    where
        F: Fn(usize) -> Result<E> + Sync,
    {
        if num_envs == 0 {
            return Err(OcenvError::ConfigError(
                "at least one environment is required".to_string(),
            ));
        }

        let envs: Vec<E> = (0..num_envs)
            .into_par_iter()
            .map(|rank| make(rank))
            .collect::<Result<Vec<_>>>()?;

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

impl<E: Env> VecEnvBackend for Parallel<E> {
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
        let results: Vec<_> = self
            .envs
            .par_iter_mut()
            .enumerate()
            .map(|(i, env)| {
                let env_seed = seed.map(|s| s + i as u64);
                env.reset(env_seed)
            })
            .collect();

        let mut observations = Vec::with_capacity(self.envs.len() * self.obs_dim);
        let mut infos = Vec::with_capacity(self.envs.len());
        for (obs, info) in results {
            observations.extend(obs.into_iter());
            infos.push(info);
        }

        let obs_array = Array2::from_shape_vec((self.envs.len(), self.obs_dim), observations)
            .expect("observation size mismatch across environments");

        (obs_array, infos)
    }

    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        let num_envs = self.envs.len();

        let results: Vec<_> = self
            .envs
            .par_iter_mut()
            .enumerate()
            .map(|(i, env)| {
                let action_row = actions.row(i);
                let action =
                    ArrayD::from_shape_vec(IxDyn(&[action_row.len()]), action_row.to_vec())
                        .expect("action row copy cannot fail");

                // Finished environments restart instead of stepping
                if env.is_done() {
                    let (obs, info) = env.reset(None);
                    (obs, 0.0, false, false, info)
                } else {
                    let res = env.step(&action);
                    (
                        res.observation,
                        res.reward,
                        res.terminated,
                        res.truncated,
                        res.info,
                    )
                }
            })
            .collect();

        let mut observations = Vec::with_capacity(num_envs * self.obs_dim);
        let mut rewards = Vec::with_capacity(num_envs);
        let mut terminated = Vec::with_capacity(num_envs);
        let mut truncated = Vec::with_capacity(num_envs);
        let mut infos = Vec::with_capacity(num_envs);
        for (obs, reward, term, trunc, info) in results {
            observations.extend(obs.into_iter());
            rewards.push(reward);
            terminated.push(term);
            truncated.push(trunc);
            infos.push(info);
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
        self.envs.par_iter_mut().for_each(|env| {
            env.close();
        });
    }
}
