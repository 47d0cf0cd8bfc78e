//! Application model: the frontend-facing view of the player.
//!
//! `App` mirrors the engine's published state (playlist view snapshots and
//! the shared playback info) and holds purely local concerns: list
//! selection, the one-shot status line, and the text prompt used for
//! playlist names and track paths.

use crate::audio::{PlaybackHandle, PlaybackInfo, StoreView};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What an open text prompt will be used for once submitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    CreatePlaylist,
    RenamePlaylist,
    AddTrack,
}

#[derive(Debug)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// The main application model.
#[derive(Default)]
pub struct App {
    /// Playlist names in store order.
    pub playlists: Vec<String>,
    pub active: Option<String>,
    /// Track display names of the active playlist, in chain order.
    pub tracks: Vec<String>,
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    pub status: Option<String>,
    pub prompt: Option<Prompt>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the shared snapshot used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Replace the playlist view with a fresh engine snapshot, keeping the
    /// selection in range.
    pub fn apply_view(&mut self, view: StoreView) {
        self.playlists = view.playlists;
        self.active = view.active;
        self.tracks = view.tracks;
        if self.selected >= self.tracks.len() {
            self.selected = self.tracks.len().saturating_sub(1);
        }
    }

    /// Map the shared playback flags onto the three-state display value.
    pub fn sync_playback(&mut self, info: &PlaybackInfo) {
        self.playback = if info.playing {
            PlaybackState::Playing
        } else if info.loaded {
            PlaybackState::Paused
        } else {
            PlaybackState::Stopped
        };
    }

    /// Track list lines for rendering: `"<1-based>. <name>"`.
    pub fn display_lines(&self) -> Vec<String> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. {}", i + 1, name))
            .collect()
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track_name(&self) -> Option<&str> {
        self.tracks.get(self.selected).map(String::as_str)
    }

    /// Move selection down one row, stopping at the last entry.
    pub fn next(&mut self) {
        if self.selected + 1 < self.tracks.len() {
            self.selected += 1;
        }
    }

    /// Move selection up one row, stopping at the first entry.
    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Name of the playlist after the active one, wrapping around.
    pub fn playlist_after_active(&self) -> Option<String> {
        if self.playlists.is_empty() {
            return None;
        }
        let pos = self
            .active
            .as_deref()
            .and_then(|a| self.playlists.iter().position(|n| n == a))
            .unwrap_or(0);
        Some(self.playlists[(pos + 1) % self.playlists.len()].clone())
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        let input = match kind {
            // Renaming starts from the current name, like an edit field.
            PromptKind::RenamePlaylist => self.active.clone().unwrap_or_default(),
            _ => String::new(),
        };
        self.prompt = Some(Prompt { kind, input });
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.input.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.input.pop();
        }
    }

    /// Close the prompt and hand its contents to the caller.
    pub fn take_prompt(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }
}
