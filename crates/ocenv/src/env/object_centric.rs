//! Seam between the factory and the external environment libraries.
//!
//! Object extraction and Atari emulation are not implemented here; the
//! factory depends on the [`EnvProvider`] capability interface and any
//! concrete binding (or test fake) supplies the environments.

use crate::env::Env;
use crate::factory::RewardMode;
use crate::Result;
use std::path::PathBuf;

/// Rendering requested for a constructed environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// No rendering
    #[default]
    Off,
    /// On-screen rendering for a human observer
    Human,
}

/// Construction settings handed to the object-centric environment library.
#[derive(Clone, Debug)]
pub struct OcEnvSettings {
    /// Environment name, e.g. `ALE/Pong-v5`
    pub name: String,
    /// Directory holding focus files
    pub focus_dir: PathBuf,
    /// Focus file to load; `None` lets the library derive its own
    pub focus_file: Option<String>,
    /// Hide selected object properties from the extracted observation
    pub hide_properties: bool,
    /// Suppress construction-time diagnostics
    pub silent: bool,
    /// Re-derive the focus file on construction
    pub refresh_focus: bool,
    /// Reward shaping applied inside the environment
    pub reward_mode: RewardMode,
    /// Rendering mode
    pub render_mode: RenderMode,
    /// Draw the extracted objects on top of the rendered frame
    pub render_overlay: bool,
    /// Keep reporting the last known position of occluded objects
    pub freeze_invisible: bool,
}

/// Construction settings for the pixel Atari pipeline.
#[derive(Clone, Debug)]
pub struct AtariSettings {
    /// Environment name
    pub name: String,
    /// Number of frames each action is repeated for
    pub frameskip: u32,
    /// Rendering mode
    pub render_mode: RenderMode,
}

/// Capability interface over the external environment libraries.
///
/// The factory depends on this contract rather than on a concrete
/// extraction or emulation library, so both can be substituted with fakes
/// in tests and demos. Construction is fallible; any error the library
/// raises propagates unmodified.
pub trait EnvProvider: Sync {
    /// Object-centric environment type
    type OcEnv: Env + 'static;
    /// Preprocessed pixel environment type
    type AtariEnv: Env + 'static;

    /// Construct one object-centric environment.
    fn make_object_centric(&self, settings: &OcEnvSettings) -> Result<Self::OcEnv>;

    /// Construct one preprocessed pixel environment.
    fn make_atari(&self, settings: &AtariSettings) -> Result<Self::AtariEnv>;
}
