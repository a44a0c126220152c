//! Built-in environments for ocenv.
//!
//! Provides synthetic stand-ins for the external object-centric and pixel
//! pipelines:
//! - `Paddleball` - paddle-and-ball game with object observations
//! - `PaddleballPixels` - the same game rendered to a coarse pixel grid
//! - `SyntheticProvider` - `EnvProvider` over the two, for demos and tests

mod paddleball;
mod pixels;
mod provider;

pub use paddleball::Paddleball;
pub use pixels::PaddleballPixels;
pub use provider::SyntheticProvider;
