//! Audio-related small types and handles.
//!
//! This module defines the command and event vocabulary spoken between the
//! frontend and the engine thread, plus the shared playback snapshot.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::PlayerError;

/// Commands processed one at a time by the engine thread.
#[derive(Debug)]
pub enum EngineCmd {
    /// Load the entry at the given 0-based position of the active playlist
    /// and start playback.
    PlayIndex(usize),
    /// Toggle play/pause; loads the head of the active playlist when nothing
    /// is loaded yet.
    PlayPause,
    /// Stop playback and release the decoder and output device.
    Stop,
    /// Skip to the next entry; stops with an "ended" signal at the tail.
    Next,
    /// Go back to the previous entry, if there is one.
    Prev,
    /// Seek to frame zero; starts playback when stopped.
    Restart,
    /// Absolute seek, in PCM frames of the loaded track.
    Seek(u64),
    /// Master volume, 0-100. Applies immediately when a device is open and
    /// carries over to the next load either way.
    SetVolume(u8),
    CreatePlaylist {
        name: String,
        icon: Option<PathBuf>,
    },
    RenamePlaylist {
        old: String,
        new: String,
    },
    AppendTrack {
        playlist: String,
        name: String,
        path: PathBuf,
    },
    RemoveTrack {
        playlist: String,
        name: String,
    },
    SelectPlaylist(String),
    /// Shut the engine thread down.
    Quit,
}

/// Discrete notifications emitted by the engine for the frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The set of playlists or the active playlist's contents changed.
    View(StoreView),
    /// A track landed in the active playlist at this 1-based position.
    TrackAdded { name: String, position: usize },
    /// Playback ran off the end of the active playlist.
    PlaylistEnded,
    /// A recoverable failure; the engine is in a well-defined state.
    Error(PlayerError),
}

/// Snapshot of the playlist store for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreView {
    /// Playlist names in insertion order.
    pub playlists: Vec<String>,
    pub active: Option<String>,
    /// Track display names of the active playlist, in chain order.
    pub tracks: Vec<String>,
}

/// Runtime playback information shared with the frontend.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Display name of the current track, if any was loaded.
    pub track: Option<String>,
    /// A decoder/output binding is open.
    pub loaded: bool,
    /// The device is actively pulling frames.
    pub playing: bool,
    /// Last observed read position, in PCM frames.
    pub cursor_frames: u64,
    /// Length of the loaded track, in PCM frames.
    pub total_frames: u64,
    pub sample_rate: u32,
    /// Master volume, 0-100.
    pub volume: u8,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            track: None,
            loaded: false,
            playing: false,
            cursor_frames: 0,
            total_frames: 0,
            sample_rate: 0,
            volume: 80,
        }
    }
}

impl PlaybackInfo {
    pub fn elapsed_text(&self) -> String {
        format_frames(self.cursor_frames, self.sample_rate)
    }

    pub fn total_text(&self) -> String {
        format_frames(self.total_frames, self.sample_rate)
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Format a frame count as `mm:ss`, or `h:mm:ss` from one hour up.
pub fn format_frames(frames: u64, sample_rate: u32) -> String {
    if sample_rate == 0 {
        return "00:00".to_string();
    }
    let total_secs = frames / u64::from(sample_rate);
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
