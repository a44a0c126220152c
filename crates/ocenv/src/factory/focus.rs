//! Focus-file name and path derivation.
//!
//! Focus files tell the object-centric pipeline which entities and
//! properties to extract. They are read-only inputs resolved here and
//! consumed by the environment library.

use crate::{OcenvError, Result};
use std::path::PathBuf;

/// Directories holding focus files.
#[derive(Clone, Debug)]
pub struct FocusConfig {
    /// Curated per-game focus files (the `default` concept)
    pub focus_dir: PathBuf,
    /// Raw, game-name-derived focus files (the `unpruned` concept)
    pub unpruned_focus_dir: PathBuf,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus_dir: PathBuf::from("resources/focusfiles"),
            unpruned_focus_dir: PathBuf::from("resources/focusfiles_unpruned"),
        }
    }
}

impl FocusConfig {
    /// Create a config with explicit directories.
    pub fn new(focus_dir: impl Into<PathBuf>, unpruned_focus_dir: impl Into<PathBuf>) -> Self {
        Self {
            focus_dir: focus_dir.into(),
            unpruned_focus_dir: unpruned_focus_dir.into(),
        }
    }
}

/// Extract the short game identifier, e.g. `ALE/Pong-v5` -> `pong`.
pub fn atari_identifier(env_name: &str) -> String {
    let game = env_name.split('/').nth(1).unwrap_or(env_name);
    game.split('-').next().unwrap_or(game).to_lowercase()
}

fn env_identifier(env_name: &str) -> String {
    if env_name.contains("ALE") {
        atari_identifier(env_name)
    } else {
        env_name.to_string()
    }
}

/// Focus file name for the curated (`default`) concept set.
pub fn pruned_focus_file_name(env_name: &str) -> String {
    format!("{}.yaml", env_identifier(env_name))
}

/// Resolve a prune concept to a concrete focus-file path.
///
/// Unknown concepts are a configuration error; there is no fallback.
pub fn focus_file_path(
    prune_concept: &str,
    env_name: &str,
    dirs: &FocusConfig,
) -> Result<PathBuf> {
    match prune_concept {
        "default" => Ok(dirs.focus_dir.join(pruned_focus_file_name(env_name))),
        "unpruned" => {
            let suffix = env_name.get(4..).unwrap_or("");
            Ok(dirs
                .unpruned_focus_dir
                .join(format!("default_focus_{}.yaml", suffix)))
        }
        other => Err(OcenvError::ConfigError(format!(
            "unknown prune concept '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_atari_identifier() {
        assert_eq!(atari_identifier("ALE/Pong-v5"), "pong");
        assert_eq!(atari_identifier("ALE/Breakout-v5"), "breakout");
        assert_eq!(atari_identifier("ALE/SpaceInvaders-v5"), "spaceinvaders");
    }

    #[test]
    fn test_pruned_focus_file_name() {
        assert_eq!(pruned_focus_file_name("ALE/Pong-v5"), "pong.yaml");
        assert_eq!(pruned_focus_file_name("MyCustomGame"), "MyCustomGame.yaml");
    }

    #[test]
    fn test_default_concept_path() {
        let dirs = FocusConfig::default();
        let path = focus_file_path("default", "ALE/Breakout-v5", &dirs).unwrap();
        assert_eq!(path, dirs.focus_dir.join("breakout.yaml"));
        assert_eq!(path.file_name().unwrap(), "breakout.yaml");
    }

    #[test]
    fn test_unpruned_concept_path() {
        let dirs = FocusConfig::new("f", "u");
        let path = focus_file_path("unpruned", "ALE/Pong-v5", &dirs).unwrap();
        assert_eq!(path, Path::new("u").join("default_focus_Pong-v5.yaml"));
    }

    #[test]
    fn test_unknown_concept_fails() {
        let dirs = FocusConfig::default();
        let err = focus_file_path("bogus", "ALE/Pong-v5", &dirs).unwrap_err();
        assert!(matches!(err, crate::OcenvError::ConfigError(_)));
    }
}
