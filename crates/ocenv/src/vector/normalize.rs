//! Observation and reward normalization wrapper.

use super::vecenv::{VecEnvBackend, VecEnvResult};
use crate::env::EnvInfo;
use crate::spaces::Space;
use crate::stats::RunningMeanStd;
use crate::{OcenvError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persisted statistics for [`VecNormalize`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NormalizeState {
    /// Per-dimension observation statistics
    pub obs_rms: RunningMeanStd,
    /// Discounted-return statistics (dimension 1)
    pub ret_rms: RunningMeanStd,
    /// Discount used for the return estimate
    pub gamma: f64,
    /// Normalized observations are clipped to `[-clip_obs, clip_obs]`
    pub clip_obs: f32,
    /// Normalized rewards are clipped to `[-clip_reward, clip_reward]`
    pub clip_reward: f32,
    /// Whether observations are normalized
    pub norm_obs: bool,
    /// Whether rewards are normalized
    pub norm_reward: bool,
}

/// Wrapper that normalizes observations and rewards with running
/// statistics.
///
/// Observations are shifted/scaled to approximately zero mean and unit
/// variance per dimension; rewards are scaled by the standard deviation of
/// the discounted return. The `training` flag controls whether statistics
/// keep updating online; evaluation handles reuse frozen statistics.
pub struct VecNormalize<B: VecEnvBackend> {
    backend: B,
    state: NormalizeState,
    /// Running discounted return per environment
    returns: Vec<f64>,
    training: bool,
}

impl<B: VecEnvBackend> std::fmt::Debug for VecNormalize<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecNormalize")
            .field("training", &self.training)
            .finish_non_exhaustive()
    }
}

impl<B: VecEnvBackend> VecNormalize<B> {
    /// Wrap a backend with fresh statistics.
    pub fn new(backend: B, norm_obs: bool, norm_reward: bool, training: bool) -> Self {
        let obs_dim = backend.observation_space().flat_dim();
        let num_envs = backend.num_envs();
        Self {
            backend,
            state: NormalizeState {
                obs_rms: RunningMeanStd::new(obs_dim),
                ret_rms: RunningMeanStd::new(1),
                gamma: 0.99,
                clip_obs: 10.0,
                clip_reward: 10.0,
                norm_obs,
                norm_reward,
            },
            returns: vec![0.0; num_envs],
            training,
        }
    }

    /// Restore statistics from a file written by [`VecNormalize::save`].
    ///
    /// The restored statistics must match the wrapped backend's
    /// observation dimensionality. The training flag starts out false;
    /// call [`VecNormalize::set_training`] to resume online updates.
    pub fn load(path: impl AsRef<Path>, backend: B) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let state: NormalizeState = serde_json::from_slice(&bytes)?;

        let expected = backend.observation_space().flat_dim();
        if state.obs_rms.dim() != expected {
            return Err(OcenvError::ShapeMismatch {
                expected: vec![expected],
                actual: vec![state.obs_rms.dim()],
            });
        }

        tracing::debug!(
            path = %path.as_ref().display(),
            samples = state.obs_rms.count(),
            "Restored normalization statistics"
        );

        let num_envs = backend.num_envs();
        Ok(Self {
            backend,
            state,
            returns: vec![0.0; num_envs],
            training: false,
        })
    }

    /// Persist the current statistics as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.state)?;
        fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Set whether statistics update online.
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    /// Whether statistics update online.
    pub fn training(&self) -> bool {
        self.training
    }

    /// Access the current statistics.
    pub fn state(&self) -> &NormalizeState {
        &self.state
    }

    fn normalize_obs(&mut self, obs: &mut Array2<f32>) {
        if !self.state.norm_obs {
            return;
        }
        let dim = self.state.obs_rms.dim();
        let flat = obs
            .as_slice_mut()
            .expect("observation batch must be contiguous");
        if self.training {
            self.state.obs_rms.update_batch(flat);
        }
        for sample in flat.chunks_exact_mut(dim) {
            self.state
                .obs_rms
                .normalize_clip_inplace(sample, self.state.clip_obs);
        }
    }

    fn normalize_rewards(&mut self, rewards: &mut [f32], dones: &[bool]) {
        if !self.state.norm_reward {
            return;
        }
        for (i, reward) in rewards.iter_mut().enumerate() {
            self.returns[i] = self.returns[i] * self.state.gamma + *reward as f64;
            if self.training {
                self.state.ret_rms.update(&[self.returns[i] as f32]);
            }
            let scale = (self.state.ret_rms.variance()[0] + self.state.ret_rms.epsilon()).sqrt();
            let scaled = (*reward as f64 / scale) as f32;
            *reward = scaled.clamp(-self.state.clip_reward, self.state.clip_reward);
            if dones[i] {
                self.returns[i] = 0.0;
            }
        }
    }
}

impl<B: VecEnvBackend> VecEnvBackend for VecNormalize<B> {
    fn observation_space(&self) -> Space {
        self.backend.observation_space()
    }

    fn action_space(&self) -> Space {
        self.backend.action_space()
    }

    fn num_envs(&self) -> usize {
        self.backend.num_envs()
    }

    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, Vec<EnvInfo>) {
        let (mut obs, infos) = self.backend.reset(seed);
        self.returns.fill(0.0);
        self.normalize_obs(&mut obs);
        (obs, infos)
    }

    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        let mut result = self.backend.step(actions);
        let dones = result.dones();
        self.normalize_obs(&mut result.observations);
        self.normalize_rewards(&mut result.rewards, &dones);
        result
    }

    fn close(&mut self) {
        self.backend.close()
    }
}
