//! The playback engine and its collaborator boundary.
//!
//! `backend` defines the decoder/output-device traits (with the rodio
//! implementation), `engine` the state machine that drives them, `thread`
//! the command loop, and `player` the frontend-side handle.

mod backend;
mod engine;
mod player;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{EngineCmd, EngineEvent, PlaybackHandle, PlaybackInfo, StoreView};
