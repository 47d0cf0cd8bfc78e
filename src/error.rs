//! Error types shared by the playlist store and the playback engine.

use std::path::PathBuf;

use thiserror::Error;

/// Player-level errors. All of these are recoverable: the engine stays in a
/// well-defined state and reports them to the frontend as one-shot messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    /// The decoding collaborator could not open the file at this path.
    #[error("cannot open audio file: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The output device could not be initialized for the decoded format.
    #[error("audio device init failed: {0}")]
    DeviceInit(String),

    /// The exact path is already present in the target playlist.
    #[error("already in playlist: {}", path.display())]
    DuplicateTrack { path: PathBuf },

    #[error("a playlist named \"{0}\" already exists")]
    DuplicatePlaylistName(String),

    #[error("playlist name cannot be empty")]
    EmptyPlaylistName,

    /// Removal was requested for a display name that is no longer present.
    /// Selection in the frontend should always correspond to a live entry,
    /// so this doubles as an internal-consistency warning.
    #[error("no track named \"{0}\" in playlist")]
    TrackNotFound(String),

    #[error("no playlist named \"{0}\"")]
    NoPlaylist(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
