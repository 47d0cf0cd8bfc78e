//! The playlist store: an insertion-ordered mapping from unique playlist
//! name to [`Playlist`], plus the "active" selection.
//!
//! The active playlist is tracked by name and resolved through the store on
//! each access, so renames and internal reallocation can never leave a stale
//! reference behind.

use std::path::PathBuf;

use crate::error::{PlayerError, Result};

use super::model::{EntryId, Playlist};

#[derive(Debug, Default)]
pub struct PlaylistStore {
    lists: Vec<Playlist>,
    active: Option<String>,
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Playlist names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.lists.iter().map(|l| l.name().to_string()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.lists.iter().find(|l| l.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Playlist> {
        self.lists.iter_mut().find(|l| l.name() == name)
    }

    /// Create an empty playlist. The first playlist ever created becomes
    /// active; explicit selection is the caller's business otherwise.
    pub fn create(&mut self, name: &str, icon: Option<PathBuf>) -> Result<()> {
        if name.is_empty() {
            return Err(PlayerError::EmptyPlaylistName);
        }
        if self.get(name).is_some() {
            return Err(PlayerError::DuplicatePlaylistName(name.to_string()));
        }

        self.lists.push(Playlist::with_icon(name, icon));
        if self.active.is_none() {
            self.active = Some(name.to_string());
        }
        Ok(())
    }

    /// Change a playlist's key. The entry chain is untouched, and the active
    /// selection follows the rename.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        if new.is_empty() {
            return Err(PlayerError::EmptyPlaylistName);
        }
        if self.get(new).is_some() {
            return Err(PlayerError::DuplicatePlaylistName(new.to_string()));
        }

        let list = self
            .get_mut(old)
            .ok_or_else(|| PlayerError::NoPlaylist(old.to_string()))?;
        list.set_name(new.to_string());

        if self.active.as_deref() == Some(old) {
            self.active = Some(new.to_string());
        }
        Ok(())
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if self.get(name).is_none() {
            return Err(PlayerError::NoPlaylist(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Playlist> {
        self.active.as_deref().and_then(|n| self.get(n))
    }

    pub fn active_mut(&mut self) -> Option<&mut Playlist> {
        let name = self.active.clone()?;
        self.get_mut(&name)
    }

    /// Append a track to the named playlist, rejecting an exact duplicate
    /// path. Returns the new entry's 1-based position.
    pub fn append_track(
        &mut self,
        playlist: &str,
        name: &str,
        path: impl Into<PathBuf>,
    ) -> Result<usize> {
        let path = path.into();
        let list = self
            .get_mut(playlist)
            .ok_or_else(|| PlayerError::NoPlaylist(playlist.to_string()))?;

        if list.contains_path(&path) {
            return Err(PlayerError::DuplicateTrack { path });
        }

        list.append(name, path);
        Ok(list.len())
    }

    /// Remove the first entry with this display name from the named playlist.
    /// Returns the removed handle so the engine can drop a matching "current
    /// track" reference.
    pub fn remove_track(&mut self, playlist: &str, name: &str) -> Result<EntryId> {
        let list = self
            .get_mut(playlist)
            .ok_or_else(|| PlayerError::NoPlaylist(playlist.to_string()))?;

        list.remove_first_named(name)
            .ok_or_else(|| PlayerError::TrackNotFound(name.to_string()))
    }
}
