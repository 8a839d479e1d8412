//! Platform-free core of the audio-reactive point-cloud rig.
//!
//! Hosts feed it analyser snapshots, key transitions and controller triples;
//! it hands back deformed attribute buffers plus the state a scene layer
//! needs (post effect, stage controls, queued model/animation requests).

pub mod audio;
pub mod constants;
pub mod deform;
pub mod display;
pub mod envelope;
pub mod error;
pub mod input;
pub mod monitor;
pub mod params;
pub mod post;
pub mod rig;
pub mod scene;
pub mod stage;

pub use audio::*;
pub use deform::*;
pub use display::*;
pub use envelope::*;
pub use error::*;
pub use input::*;
pub use monitor::*;
pub use params::*;
pub use post::*;
pub use rig::*;
pub use scene::*;
pub use stage::*;
