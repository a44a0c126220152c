//! Environment interface-compatibility checking.

use super::Env;
use crate::spaces::Space;
use crate::{OcenvError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Validate an environment against the standard interface contract.
///
/// The factory builds one probe instance per object-centric construction,
/// runs it through this check, and discards it before fanning out the real
/// parallel set. The check exercises reset and a single sampled step and
/// verifies space sanity, observation shapes and value finiteness.
pub fn check_env<E: Env>(env: &mut E) -> Result<()> {
    let obs_space = env.observation_space();
    let action_space = env.action_space();
    check_space(&obs_space)?;
    check_space(&action_space)?;

    let (obs, _info) = env.reset(Some(0));
    if obs.shape() != obs_space.shape().as_slice() {
        return Err(OcenvError::ShapeMismatch {
            expected: obs_space.shape(),
            actual: obs.shape().to_vec(),
        });
    }
    if obs.iter().any(|v| !v.is_finite()) {
        return Err(OcenvError::EnvError(
            "reset returned a non-finite observation".to_string(),
        ));
    }
    if !obs_space.contains(&obs) {
        return Err(OcenvError::EnvError(
            "reset observation lies outside the observation space".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(0);
    let action = action_space.sample(&mut rng);
    let result = env.step(&action);
    if result.observation.shape() != obs_space.shape().as_slice() {
        return Err(OcenvError::ShapeMismatch {
            expected: obs_space.shape(),
            actual: result.observation.shape().to_vec(),
        });
    }
    if !result.reward.is_finite() {
        return Err(OcenvError::EnvError(
            "step returned a non-finite reward".to_string(),
        ));
    }
    if result.observation.iter().any(|v| !v.is_finite()) {
        return Err(OcenvError::EnvError(
            "step returned a non-finite observation".to_string(),
        ));
    }

    Ok(())
}

fn check_space(space: &Space) -> Result<()> {
    match space {
        Space::Box { low, high } => {
            if low.is_empty() {
                return Err(OcenvError::EnvError("empty box space".to_string()));
            }
            if low.shape() != high.shape() {
                return Err(OcenvError::ShapeMismatch {
                    expected: low.shape().to_vec(),
                    actual: high.shape().to_vec(),
                });
            }
            if low.iter().zip(high.iter()).any(|(&l, &h)| l > h) {
                return Err(OcenvError::EnvError(
                    "box space has low bound above high bound".to_string(),
                ));
            }
        }
        Space::Discrete { n } => {
            if *n == 0 {
                return Err(OcenvError::EnvError(
                    "discrete space with zero actions".to_string(),
                ));
            }
        }
    }
    Ok(())
}
