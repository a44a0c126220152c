//! Pixel-grid variant of the paddle-and-ball game.

use crate::Paddleball;
use ndarray::{ArrayD, IxDyn};
use ocenv::env::object_centric::AtariSettings;
use ocenv::env::{Env, EnvInfo, StepResult};
use ocenv::spaces::Space;

/// Side length of the rendered grid.
const GRID: usize = 8;

/// The paddle-and-ball dynamics rendered to a coarse pixel grid.
///
/// The observation is a flattened `GRID x GRID` frame with the ball and
/// paddle cells lit. Each action is repeated `frameskip` times with
/// rewards summed, mirroring Atari-style preprocessing.
pub struct PaddleballPixels {
    inner: Paddleball,
    frameskip: u32,
}

impl PaddleballPixels {
    /// Create with default settings and a frame skip of 4.
    pub fn new() -> Self {
        Self {
            inner: Paddleball::new(),
            frameskip: 4,
        }
    }

    /// Create from Atari construction settings.
    pub fn from_settings(settings: &AtariSettings) -> Self {
        // The pixel pipeline always runs the raw env reward
        let mut inner = Paddleball::new();
        inner.set_render_mode(settings.render_mode);
        Self {
            inner,
            frameskip: settings.frameskip.max(1),
        }
    }

    fn frame(&self) -> ArrayD<f32> {
        let mut pixels = vec![0.0f32; GRID * GRID];

        let ball = self.inner.ball();
        // Row 0 is the top of the playfield
        let col = ((ball[0] * (GRID - 1) as f32).round() as usize).min(GRID - 1);
        let row = (((1.0 - ball[1]) * (GRID - 1) as f32).round() as usize).min(GRID - 1);
        pixels[row * GRID + col] = 1.0;

        let paddle_x = self.inner.paddle_x();
        let half = self.inner.paddle_half_width();
        let lo = (((paddle_x - half).max(0.0) * (GRID - 1) as f32).round() as usize).min(GRID - 1);
        let hi = (((paddle_x + half).min(1.0) * (GRID - 1) as f32).round() as usize).min(GRID - 1);
        for c in lo..=hi {
            pixels[(GRID - 1) * GRID + c] = 1.0;
        }

        ArrayD::from_shape_vec(IxDyn(&[GRID * GRID]), pixels).unwrap()
    }
}

impl Default for PaddleballPixels {
    fn default() -> Self {
        Self::new()
    }
}

impl Env for PaddleballPixels {
    fn observation_space(&self) -> Space {
        Space::uniform_box(&[GRID * GRID], 0.0, 1.0)
    }

    fn action_space(&self) -> Space {
        self.inner.action_space()
    }

    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
        let (_obs, info) = self.inner.reset(seed);
        (self.frame(), info)
    }

    fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
        let mut reward = 0.0;
        let mut last = None;
        for _ in 0..self.frameskip {
            let result = self.inner.step(action);
            reward += result.reward;
            let done = result.done();
            last = Some(result);
            if done {
                break;
            }
        }
        let last = last.expect("frameskip is at least 1");

        StepResult {
            observation: self.frame(),
            reward,
            terminated: last.terminated,
            truncated: last.truncated,
            info: last.info,
        }
    }

    fn render(&self) -> Option<String> {
        self.inner.render()
    }

    fn is_done(&self) -> bool {
        self.inner.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocenv::env::object_centric::RenderMode;

    #[test]
    fn test_passes_interface_check() {
        let mut env = PaddleballPixels::new();
        ocenv::env::check_env(&mut env).unwrap();
    }

    #[test]
    fn test_frame_shape_and_contents() {
        let mut env = PaddleballPixels::new();
        let (obs, _) = env.reset(Some(0));
        assert_eq!(obs.len(), GRID * GRID);
        // Ball plus at least one paddle cell are lit
        let lit = obs.iter().filter(|&&v| v > 0.0).count();
        assert!(lit >= 2);
    }

    #[test]
    fn test_frameskip_repeats_action() {
        let settings = AtariSettings {
            name: "ALE/Paddleball-v5".to_string(),
            frameskip: 3,
            render_mode: RenderMode::Off,
        };
        let mut skipping = PaddleballPixels::from_settings(&settings);
        let mut stepwise = PaddleballPixels::from_settings(&AtariSettings {
            frameskip: 1,
            ..settings
        });

        skipping.reset(Some(9));
        stepwise.reset(Some(9));

        let action = ArrayD::from_elem(IxDyn(&[1]), 0.0);
        let skipped = skipping.step(&action);
        let mut summed = 0.0;
        let mut last = None;
        for _ in 0..3 {
            let r = stepwise.step(&action);
            summed += r.reward;
            last = Some(r);
        }
        assert_eq!(skipped.reward, summed);
        assert_eq!(skipped.observation, last.unwrap().observation);
    }
}
