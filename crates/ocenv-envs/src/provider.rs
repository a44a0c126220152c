//! Synthetic environment provider.

use crate::{Paddleball, PaddleballPixels};
use ocenv::env::object_centric::{AtariSettings, EnvProvider, OcEnvSettings};
use ocenv::{OcenvError, Result};

/// [`EnvProvider`] backed by the built-in synthetic environments.
///
/// Stands in for the external object-centric and Atari libraries in
/// demos and tests; the factory is exercised end to end without either
/// heavyweight dependency.
pub struct SyntheticProvider;

impl EnvProvider for SyntheticProvider {
    type OcEnv = Paddleball;
    type AtariEnv = PaddleballPixels;

    fn make_object_centric(&self, settings: &OcEnvSettings) -> Result<Paddleball> {
        if settings.name.is_empty() {
            return Err(OcenvError::EnvError(
                "environment name must not be empty".to_string(),
            ));
        }
        Ok(Paddleball::from_settings(settings))
    }

    fn make_atari(&self, settings: &AtariSettings) -> Result<PaddleballPixels> {
        if settings.name.is_empty() {
            return Err(OcenvError::EnvError(
                "environment name must not be empty".to_string(),
            ));
        }
        Ok(PaddleballPixels::from_settings(settings))
    }
}
