//! ocenv CLI
//!
//! Command-line interface for resolving focus files and rolling out the
//! built-in environments.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ocenv::factory::{build_vec_env, focus_file_path, FocusConfig, VecEnvConfig};
use ocenv::log::{EpisodeSummary, Recorder};
use ocenv::vector::VecEnvBackend;
use ocenv_envs::SyntheticProvider;

#[derive(Parser)]
#[command(name = "ocenv")]
#[command(version, about = "ocenv - Object-centric vectorized environments for RL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the focus-file path for an environment
    Focus {
        /// Environment name, e.g. ALE/Pong-v5
        env: String,

        /// Prune concept (default, unpruned)
        #[arg(long, default_value = "default")]
        concept: String,

        /// Directory holding curated focus files
        #[arg(long)]
        focus_dir: Option<PathBuf>,

        /// Directory holding unpruned focus files
        #[arg(long)]
        unpruned_dir: Option<PathBuf>,
    },

    /// List built-in environments
    List,

    /// Roll out a vectorized environment with random actions
    Demo {
        /// Environment name
        #[arg(default_value = "ALE/Paddleball-v5")]
        env: String,

        /// Number of parallel environments
        #[arg(long, default_value = "4")]
        num_envs: usize,

        /// Number of vectorized steps
        #[arg(long, default_value = "200")]
        steps: usize,

        /// Base seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Use the pixel pipeline instead of object-centric extraction
        #[arg(long)]
        pixels: bool,

        /// Record episode metrics into this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Focus {
            env,
            concept,
            focus_dir,
            unpruned_dir,
        } => {
            let mut dirs = FocusConfig::default();
            if let Some(dir) = focus_dir {
                dirs.focus_dir = dir;
            }
            if let Some(dir) = unpruned_dir {
                dirs.unpruned_focus_dir = dir;
            }
            let path = focus_file_path(&concept, &env, &dirs)?;
            println!("{}", path.display());
        }

        Commands::List => {
            println!("Available environments:");
            println!("  paddleball         - object-centric paddle-and-ball game");
            println!("  paddleball-pixels  - the same game on a coarse pixel grid");
        }

        Commands::Demo {
            env,
            num_envs,
            steps,
            seed,
            pixels,
            log_dir,
        } => {
            run_demo(env, num_envs, steps, seed, pixels, log_dir)?;
        }
    }

    Ok(())
}

fn run_demo(
    env_name: String,
    num_envs: usize,
    steps: usize,
    seed: u64,
    pixels: bool,
    log_dir: Option<PathBuf>,
) -> Result<()> {
    let cfg = VecEnvConfig::new(env_name)
        .object_centric(!pixels)
        .with_n_envs(num_envs)
        .with_seed(seed);

    let mut env = build_vec_env(&SyntheticProvider, &cfg)?;
    let mut recorder = match log_dir {
        Some(dir) => Some(Recorder::create(dir)?),
        None => None,
    };

    tracing::info!(
        num_envs = env.num_envs(),
        obs_dim = env.observation_space().flat_dim(),
        "Starting demo rollout"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let action_space = env.action_space();
    let action_dim = action_space.shape().iter().product();

    env.reset(Some(seed));
    let mut total_steps: u64 = 0;
    let mut episodes: u64 = 0;

    for _ in 0..steps {
        let mut actions = Array2::zeros((num_envs, action_dim));
        for i in 0..num_envs {
            let sample = action_space.sample(&mut rng);
            for (j, v) in sample.iter().enumerate() {
                actions[(i, j)] = *v;
            }
        }

        let result = env.step(&actions);
        total_steps += num_envs as u64;

        for info in &result.infos {
            let (Some(ep_return), Some(ep_length)) = (info.episode_return, info.episode_length)
            else {
                continue;
            };
            episodes += 1;
            if let Some(recorder) = recorder.as_mut() {
                // Random policy, so the exploration rate stays 1
                recorder.record_episode(&EpisodeSummary::new(
                    total_steps,
                    ep_return as f64,
                    ep_length as u64,
                    1.0,
                ))?;
            } else {
                tracing::info!(ep_return, ep_length, "Episode finished");
            }
        }
    }

    env.close();
    if let Some(recorder) = recorder.as_mut() {
        recorder.close()?;
    }
    tracing::info!(total_steps, episodes, "Demo finished");
    println!(
        "Ran {} steps across {} envs ({} episodes finished)",
        steps, num_envs, episodes
    );

    Ok(())
}
