//! Frame stacking wrapper for vectorized environments.

use super::vecenv::{VecEnvBackend, VecEnvResult};
use crate::env::EnvInfo;
use crate::spaces::Space;
use crate::{OcenvError, Result};
use ndarray::Array2;

/// Wrapper that concatenates the last `n_stack` observations per
/// environment along the flattened feature axis, newest frame last.
///
/// A finished environment's history is cleared before its first
/// post-reset frame, so no observation leaks across episode boundaries.
pub struct VecFrameStack<B: VecEnvBackend> {
    backend: B,
    n_stack: usize,
    /// Flattened size of a single frame
    frame_dim: usize,
    /// Rolling history, one row per env, `frame_dim * n_stack` wide
    stacked: Array2<f32>,
}

impl<B: VecEnvBackend> std::fmt::Debug for VecFrameStack<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecFrameStack")
            .field("n_stack", &self.n_stack)
            .field("frame_dim", &self.frame_dim)
            .finish_non_exhaustive()
    }
}

impl<B: VecEnvBackend> VecFrameStack<B> {
    /// Wrap a backend with a history of `n_stack` frames.
    pub fn new(backend: B, n_stack: usize) -> Result<Self> {
        if n_stack == 0 {
            return Err(OcenvError::ConfigError(
                "frame stack depth must be at least 1".to_string(),
            ));
        }
        let frame_dim = backend.observation_space().flat_dim();
        let num_envs = backend.num_envs();
        Ok(Self {
            backend,
            n_stack,
            frame_dim,
            stacked: Array2::zeros((num_envs, frame_dim * n_stack)),
        })
    }

    /// Configured stack depth.
    pub fn n_stack(&self) -> usize {
        self.n_stack
    }

    /// Push the newest frames into the history; `clear` rows are zeroed
    /// first.
    fn push_frames(&mut self, frames: &Array2<f32>, clear: &[bool]) {
        let width = self.frame_dim * self.n_stack;
        let tail = width - self.frame_dim;
        let history = self
            .stacked
            .as_slice_mut()
            .expect("stacked history is contiguous");
        let frames = frames
            .as_slice()
            .expect("observation batch must be contiguous");

        for (i, frame) in frames.chunks_exact(self.frame_dim).enumerate() {
            let row = &mut history[i * width..(i + 1) * width];
            if clear.get(i).copied().unwrap_or(false) {
                row.fill(0.0);
            } else {
                row.copy_within(self.frame_dim.., 0);
            }
            row[tail..].copy_from_slice(frame);
        }
    }
}

impl<B: VecEnvBackend> VecEnvBackend for VecFrameStack<B> {
    fn observation_space(&self) -> Space {
        match self.backend.observation_space() {
            Space::Box { low, high } => {
                let tile = |bounds: &ndarray::ArrayD<f32>| {
                    let flat: Vec<f32> = bounds.iter().copied().collect();
                    flat.iter()
                        .copied()
                        .cycle()
                        .take(flat.len() * self.n_stack)
                        .collect::<Vec<f32>>()
                };
                Space::bounded_box(tile(&low), tile(&high))
            }
            other => other,
        }
    }

    fn action_space(&self) -> Space {
        self.backend.action_space()
    }

    fn num_envs(&self) -> usize {
        self.backend.num_envs()
    }

    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, Vec<EnvInfo>) {
        let (obs, infos) = self.backend.reset(seed);
        self.stacked.fill(0.0);
        let clear = vec![false; self.backend.num_envs()];
        self.push_frames(&obs, &clear);
        (self.stacked.clone(), infos)
    }

    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        let mut result = self.backend.step(actions);
        let dones = result.dones();
        self.push_frames(&result.observations, &dones);
        result.observations = self.stacked.clone();
        result
    }

    fn close(&mut self) {
        self.backend.close()
    }
}
