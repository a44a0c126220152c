//! Episode-statistics monitoring wrapper.

use super::{Env, EnvInfo, StepResult};
use crate::spaces::Space;
use ndarray::ArrayD;

/// Wrapper that tracks episode statistics (return and length).
///
/// Adds `episode_return` and `episode_length` to info on episode
/// completion. Every environment handed to a vector container goes through
/// this wrapper so the training driver can read per-episode stats from the
/// step infos.
pub struct Monitor<E: Env> {
    env: E,
    episode_return: f32,
    episode_length: u32,
}

impl<E: Env> Monitor<E> {
    /// Wrap an environment with episode statistics tracking
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode_return: 0.0,
            episode_length: 0,
        }
    }

    /// Get a reference to the inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Get a mutable reference to the inner environment
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }
}

impl<E: Env> Env for Monitor<E> {
    fn observation_space(&self) -> Space {
        self.env.observation_space()
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }

    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
        self.episode_return = 0.0;
        self.episode_length = 0;
        self.env.reset(seed)
    }

    fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
        let mut result = self.env.step(action);

        self.episode_return += result.reward;
        self.episode_length += 1;

        if result.done() {
            result.info = result
                .info
                .with_episode_stats(self.episode_return, self.episode_length);

            // Counters restart here; the env itself is reset externally
            self.episode_return = 0.0;
            self.episode_length = 0;
        }

        result
    }

    fn render(&self) -> Option<String> {
        self.env.render()
    }

    fn close(&mut self) {
        self.env.close()
    }

    fn is_done(&self) -> bool {
        self.env.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    struct CountingEnv {
        step_count: u32,
    }

    impl Env for CountingEnv {
        fn observation_space(&self) -> Space {
            Space::uniform_box(&[2], 0.0, 1.0)
        }

        fn action_space(&self) -> Space {
            Space::discrete(2)
        }

        fn reset(&mut self, _seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
            self.step_count = 0;
            (ArrayD::zeros(IxDyn(&[2])), EnvInfo::new())
        }

        fn step(&mut self, _action: &ArrayD<f32>) -> StepResult {
            self.step_count += 1;
            StepResult {
                observation: ArrayD::zeros(IxDyn(&[2])),
                reward: 1.0,
                terminated: self.step_count >= 5,
                truncated: false,
                info: EnvInfo::new(),
            }
        }
    }

    #[test]
    fn test_monitor_stamps_episode_stats() {
        let env = CountingEnv { step_count: 0 };
        let mut wrapped = Monitor::new(env);

        wrapped.reset(None);

        let action = ArrayD::zeros(IxDyn(&[1]));
        for _ in 0..4 {
            let result = wrapped.step(&action);
            assert!(!result.done());
            assert!(result.info.get("episode_return").is_none());
        }

        // 5th step terminates
        let result = wrapped.step(&action);
        assert!(result.done());
        assert_eq!(result.info.get("episode_return"), Some(5.0));
        assert_eq!(result.info.get("episode_length"), Some(5.0));
    }
}
