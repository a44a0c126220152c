//! Vectorized environment construction.
//!
//! Turns one typed [`VecEnvConfig`] into a ready-to-step [`BoxedVecEnv`]:
//! either an object-centric, normalization-wrapped container or a pixel,
//! frame-stacked one. All heavy construction is delegated through the
//! [`EnvProvider`] seam.

mod focus;

pub use focus::{atari_identifier, focus_file_path, pruned_focus_file_name, FocusConfig};

use crate::env::object_centric::{AtariSettings, EnvProvider, OcEnvSettings, RenderMode};
use crate::env::{check_env, Env, Monitor};
use crate::vector::{BoxedVecEnv, Parallel, Serial, VecEnvBackend, VecFrameStack, VecNormalize};
use crate::{OcenvError, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Reward shaping applied by the object-centric environment.
///
/// Evaluation always runs with [`RewardMode::Env`], the unshaped mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RewardMode {
    /// Raw environment reward, no shaping (code 0)
    #[default]
    Env,
    /// Human-designed shaping reward (code 1)
    Human,
    /// Environment reward plus shaping (code 2)
    Mixed,
}

impl RewardMode {
    /// Numeric code handed to the environment library.
    pub fn code(&self) -> u8 {
        match self {
            RewardMode::Env => 0,
            RewardMode::Human => 1,
            RewardMode::Mixed => 2,
        }
    }
}

impl FromStr for RewardMode {
    type Err = OcenvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "env" | "none" => Ok(RewardMode::Env),
            "human" => Ok(RewardMode::Human),
            "mixed" => Ok(RewardMode::Mixed),
            other => Err(OcenvError::ConfigError(format!(
                "unknown reward mode '{}'",
                other
            ))),
        }
    }
}

/// Fully-enumerated configuration for [`build_vec_env`].
#[derive(Clone, Debug)]
pub struct VecEnvConfig {
    /// Environment name, e.g. `ALE/Pong-v5`
    pub name: String,
    /// Number of parallel environments
    pub n_envs: usize,
    /// Base seed; environment `rank` is seeded with `seed + rank`
    pub seed: u64,
    /// Object-centric extraction vs the pixel pipeline
    pub object_centric: bool,
    /// Reward shaping mode
    pub reward_mode: RewardMode,
    /// Focus-file selection strategy, `default` or `unpruned`
    pub prune_concept: String,
    /// Hide selected object properties from the extracted observation
    pub exclude_properties: bool,
    /// Pixel pipeline: frames each action is repeated for
    pub frameskip: u32,
    /// Pixel pipeline: observation history depth
    pub framestack: usize,
    /// Normalize observations with running statistics
    pub normalize_observation: bool,
    /// Normalize rewards with running return statistics
    pub normalize_reward: bool,
    /// Restore normalization statistics from this file instead of
    /// starting fresh
    pub vec_norm_path: Option<PathBuf>,
    /// Training handle (statistics update online) vs evaluation handle
    pub train: bool,
    /// Keep reporting the last known position of occluded objects
    pub freeze_invisible_obj: bool,
    /// Rendering mode
    pub render_mode: RenderMode,
    /// Draw extracted objects on top of the rendered frame
    pub render_oc_overlay: bool,
    /// Focus-file directories
    pub focus: FocusConfig,
}

impl VecEnvConfig {
    /// Create a config with defaults for the given environment name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            n_envs: 1,
            seed: 0,
            object_centric: false,
            reward_mode: RewardMode::Env,
            prune_concept: "default".to_string(),
            exclude_properties: false,
            frameskip: 4,
            framestack: 1,
            normalize_observation: false,
            normalize_reward: false,
            vec_norm_path: None,
            train: false,
            freeze_invisible_obj: false,
            render_mode: RenderMode::Off,
            render_oc_overlay: false,
            focus: FocusConfig::default(),
        }
    }

    /// Set the number of parallel environments
    pub fn with_n_envs(mut self, n_envs: usize) -> Self {
        self.n_envs = n_envs;
        self
    }

    /// Set the base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Select the object-centric or pixel pipeline
    pub fn object_centric(mut self, enabled: bool) -> Self {
        self.object_centric = enabled;
        self
    }

    /// Set the reward shaping mode
    pub fn with_reward_mode(mut self, mode: RewardMode) -> Self {
        self.reward_mode = mode;
        self
    }

    /// Set the focus-file selection strategy
    pub fn with_prune_concept(mut self, concept: impl Into<String>) -> Self {
        self.prune_concept = concept.into();
        self
    }

    /// Hide selected object properties
    pub fn exclude_properties(mut self, enabled: bool) -> Self {
        self.exclude_properties = enabled;
        self
    }

    /// Set the pixel-pipeline frame skip
    pub fn with_frameskip(mut self, frameskip: u32) -> Self {
        self.frameskip = frameskip;
        self
    }

    /// Set the pixel-pipeline frame stack depth
    pub fn with_framestack(mut self, framestack: usize) -> Self {
        self.framestack = framestack;
        self
    }

    /// Enable observation/reward normalization
    pub fn normalize(mut self, observation: bool, reward: bool) -> Self {
        self.normalize_observation = observation;
        self.normalize_reward = reward;
        self
    }

    /// Restore normalization statistics from a file
    pub fn with_vec_norm_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vec_norm_path = Some(path.into());
        self
    }

    /// Mark as a training handle
    pub fn train(mut self, enabled: bool) -> Self {
        self.train = enabled;
        self
    }

    /// Freeze occluded objects at their last known position
    pub fn freeze_invisible_obj(mut self, enabled: bool) -> Self {
        self.freeze_invisible_obj = enabled;
        self
    }

    /// Set the rendering mode
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Set the focus-file directories
    pub fn with_focus(mut self, focus: FocusConfig) -> Self {
        self.focus = focus;
        self
    }
}

/// Seed used for the evaluation handle derived from a training seed.
pub fn eval_seed(train_seed: u64) -> u64 {
    (train_seed + 42) * 2
}

fn parallel_construction(n_envs: usize) -> bool {
    n_envs > 1
}

/// Build independent training and evaluation handles from one base
/// configuration.
///
/// The two handles share nothing: the evaluation handle gets its own seed
/// ([`eval_seed`]), always runs unshaped rewards with frozen statistics,
/// and renders only when `render_eval` is set.
pub fn build_train_eval<P: EnvProvider>(
    provider: &P,
    base: &VecEnvConfig,
    n_train_envs: usize,
    n_eval_envs: usize,
    seed: u64,
    reward_mode: RewardMode,
    render_eval: bool,
) -> Result<(BoxedVecEnv, BoxedVecEnv)> {
    let mut train_cfg = base.clone();
    train_cfg.n_envs = n_train_envs;
    train_cfg.seed = seed;
    train_cfg.train = true;
    train_cfg.reward_mode = reward_mode;
    train_cfg.render_mode = RenderMode::Off;
    let train_env = build_vec_env(provider, &train_cfg)?;

    let mut eval_cfg = base.clone();
    eval_cfg.n_envs = n_eval_envs;
    eval_cfg.seed = eval_seed(seed);
    eval_cfg.train = false;
    eval_cfg.reward_mode = RewardMode::Env;
    eval_cfg.render_mode = if render_eval {
        RenderMode::Human
    } else {
        RenderMode::Off
    };
    let eval_env = build_vec_env(provider, &eval_cfg)?;

    Ok((train_env, eval_env))
}

/// Build a vectorized environment from a configuration.
///
/// Object-centric configurations are probed once for interface
/// compatibility before the parallel set is constructed; the probe
/// instance is discarded. Container choice is exact: one environment runs
/// in-thread, more than one runs on the parallel backend.
pub fn build_vec_env<P: EnvProvider>(provider: &P, cfg: &VecEnvConfig) -> Result<BoxedVecEnv> {
    if cfg.n_envs == 0 {
        return Err(OcenvError::ConfigError(
            "n_envs must be at least 1".to_string(),
        ));
    }

    if cfg.object_centric {
        build_object_centric(provider, cfg)
    } else {
        build_pixel(provider, cfg)
    }
}

fn build_object_centric<P: EnvProvider>(provider: &P, cfg: &VecEnvConfig) -> Result<BoxedVecEnv> {
    let (focus_dir, focus_file) = match cfg.prune_concept.as_str() {
        "default" => (
            cfg.focus.focus_dir.clone(),
            Some(pruned_focus_file_name(&cfg.name)),
        ),
        "unpruned" => (cfg.focus.unpruned_focus_dir.clone(), None),
        other => {
            return Err(OcenvError::ConfigError(format!(
                "unknown prune concept '{}'",
                other
            )))
        }
    };

    // One-time compatibility probe, discarded before the fan-out
    let probe_settings = OcEnvSettings {
        name: cfg.name.clone(),
        focus_dir,
        focus_file,
        hide_properties: cfg.exclude_properties,
        silent: false,
        refresh_focus: true,
        reward_mode: cfg.reward_mode,
        render_mode: RenderMode::Off,
        render_overlay: false,
        freeze_invisible: cfg.freeze_invisible_obj,
    };
    let mut probe = provider.make_object_centric(&probe_settings)?;
    check_env(&mut probe)?;
    drop(probe);

    let settings = OcEnvSettings {
        silent: true,
        refresh_focus: false,
        render_mode: cfg.render_mode,
        render_overlay: cfg.render_oc_overlay,
        ..probe_settings
    };

    let seed = cfg.seed;
    let make = |rank: usize| -> Result<Monitor<P::OcEnv>> {
        let env = provider.make_object_centric(&settings)?;
        let mut env = Monitor::new(env);
        env.reset(Some(seed + rank as u64));
        Ok(env)
    };

    if parallel_construction(cfg.n_envs) {
        wrap_normalized(Parallel::new(make, cfg.n_envs)?, cfg)
    } else {
        wrap_normalized(Serial::new(make, cfg.n_envs)?, cfg)
    }
}

fn wrap_normalized<B>(backend: B, cfg: &VecEnvConfig) -> Result<BoxedVecEnv>
where
    B: VecEnvBackend + 'static,
{
    let env = match &cfg.vec_norm_path {
        Some(path) => {
            let mut env = VecNormalize::load(path, backend)?;
            env.set_training(cfg.train);
            env
        }
        None => VecNormalize::new(
            backend,
            cfg.normalize_observation,
            cfg.normalize_reward,
            cfg.train,
        ),
    };
    Ok(Box::new(env))
}

fn build_pixel<P: EnvProvider>(provider: &P, cfg: &VecEnvConfig) -> Result<BoxedVecEnv> {
    let settings = AtariSettings {
        name: cfg.name.clone(),
        frameskip: cfg.frameskip,
        render_mode: cfg.render_mode,
    };

    let seed = cfg.seed;
    let make = |rank: usize| -> Result<Monitor<P::AtariEnv>> {
        let env = provider.make_atari(&settings)?;
        let mut env = Monitor::new(env);
        env.reset(Some(seed + rank as u64));
        Ok(env)
    };

    if parallel_construction(cfg.n_envs) {
        Ok(Box::new(VecFrameStack::new(
            Parallel::new(make, cfg.n_envs)?,
            cfg.framestack,
        )?))
    } else {
        Ok(Box::new(VecFrameStack::new(
            Serial::new(make, cfg.n_envs)?,
            cfg.framestack,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_seed_derivation() {
        assert_eq!(eval_seed(0), 84);
        assert_eq!(eval_seed(1), 86);
        assert_eq!(eval_seed(100), 284);
        // Reproducible for a fixed train seed
        assert_eq!(eval_seed(7), eval_seed(7));
    }

    #[test]
    fn test_container_boundary_is_exact() {
        assert!(!parallel_construction(1));
        assert!(parallel_construction(2));
        assert!(parallel_construction(16));
    }

    #[test]
    fn test_reward_mode_parsing() {
        assert_eq!("env".parse::<RewardMode>().unwrap(), RewardMode::Env);
        assert_eq!("none".parse::<RewardMode>().unwrap(), RewardMode::Env);
        assert_eq!("human".parse::<RewardMode>().unwrap(), RewardMode::Human);
        assert_eq!("mixed".parse::<RewardMode>().unwrap(), RewardMode::Mixed);
        assert!("sparse".parse::<RewardMode>().is_err());
    }

    #[test]
    fn test_reward_mode_codes() {
        assert_eq!(RewardMode::Env.code(), 0);
        assert_eq!(RewardMode::Human.code(), 1);
        assert_eq!(RewardMode::Mixed.code(), 2);
    }
}
