//! The playback engine state machine.
//!
//! One thread drives `handle` and `tick`, so transitions never interleave.
//! The engine owns the playlist store, at most one open decoder/output
//! binding, and the shared snapshot the frontend reads. States: idle
//! (nothing open), loaded-stopped (binding open, device paused), playing
//! (device pulling frames, position polled every tick).

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use tracing::{debug, warn};

use crate::error::{PlayerError, Result};
use crate::playlist::{EntryId, PlaylistStore};

use super::backend::{Backend, Binding, Decoder};
use super::types::{EngineCmd, EngineEvent, PlaybackHandle, StoreView};

struct CurrentTrack {
    playlist: String,
    entry: EntryId,
    name: String,
}

pub struct Engine<B: Backend> {
    backend: B,
    store: PlaylistStore,
    events: Sender<EngineEvent>,
    info: PlaybackHandle,

    binding: Option<B::Binding>,
    /// Most recently loaded entry. Survives a manual stop so `next`/`prev`
    /// still know where they are; cleared when the entry is removed or the
    /// active playlist changes.
    current: Option<CurrentTrack>,
    playing: bool,
    cursor: u64,
    total_frames: u64,
    sample_rate: u32,
    volume: u8,
    end_threshold: u64,
}

impl<B: Backend> Engine<B> {
    pub fn new(
        backend: B,
        store: PlaylistStore,
        volume: u8,
        end_threshold: u64,
        events: Sender<EngineEvent>,
        info: PlaybackHandle,
    ) -> Self {
        let engine = Self {
            backend,
            store,
            events,
            info,
            binding: None,
            current: None,
            playing: false,
            cursor: 0,
            total_frames: 0,
            sample_rate: 0,
            volume: volume.min(100),
            end_threshold,
        };
        engine.publish_info();
        engine
    }

    /// Process one command. Returns `false` when the engine should shut down.
    pub fn handle(&mut self, cmd: EngineCmd) -> bool {
        match cmd {
            EngineCmd::PlayIndex(i) => {
                let r = self.play_index(i);
                self.report(r);
            }
            EngineCmd::PlayPause => {
                let r = self.play_pause();
                self.report(r);
            }
            EngineCmd::Stop => self.stop(),
            EngineCmd::Next => {
                let r = self.next();
                self.report(r);
            }
            EngineCmd::Prev => {
                let r = self.previous();
                self.report(r);
            }
            EngineCmd::Restart => {
                let r = self.restart();
                self.report(r);
            }
            EngineCmd::Seek(frame) => self.seek(frame),
            EngineCmd::SetVolume(level) => self.set_volume(level),
            EngineCmd::CreatePlaylist { name, icon } => {
                let r = self.create_playlist(&name, icon);
                self.report(r);
            }
            EngineCmd::RenamePlaylist { old, new } => {
                let r = self.rename_playlist(&old, &new);
                self.report(r);
            }
            EngineCmd::AppendTrack {
                playlist,
                name,
                path,
            } => {
                let r = self.append_track(&playlist, &name, path);
                self.report(r);
            }
            EngineCmd::RemoveTrack { playlist, name } => {
                let r = self.remove_track(&playlist, &name);
                self.report(r);
            }
            EngineCmd::SelectPlaylist(name) => {
                let r = self.select_playlist(&name);
                self.report(r);
            }
            EngineCmd::Quit => {
                self.stop();
                return false;
            }
        }
        true
    }

    /// One poll tick: refresh the cursor and fire auto-advance near the end.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let Some(cursor) = self.binding.as_ref().and_then(|b| b.cursor_frames()) else {
            // Unreadable cursor: skip the tick, state unchanged.
            return;
        };

        // Decoders are not guaranteed to report the exact final frame; the
        // margin decides end-of-track.
        if self.total_frames > 0 && cursor >= self.total_frames.saturating_sub(self.end_threshold) {
            debug!(cursor, total = self.total_frames, "end of track");
            let r = self.next();
            self.report(r);
            return;
        }

        self.cursor = cursor;
        self.publish_info();
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!(error = %e, "command failed");
            let _ = self.events.send(EngineEvent::Error(e));
        }
    }

    /// Close any open binding and load the given entry, entering
    /// loaded-stopped. The previously set volume carries over to the new
    /// device.
    fn load(&mut self, playlist: String, entry: EntryId) -> Result<()> {
        self.stop();

        let (name, path) = {
            let list = self
                .store
                .get(&playlist)
                .ok_or_else(|| PlayerError::NoPlaylist(playlist.clone()))?;
            match (list.name_of(entry), list.path_of(entry)) {
                (Some(n), Some(p)) => (n.to_string(), p.to_path_buf()),
                _ => return Err(PlayerError::TrackNotFound(playlist)),
            }
        };

        debug!(track = %name, "loading");
        let decoder = self.backend.open_decoder(&path)?;
        let total_frames = decoder.total_frames();
        let sample_rate = decoder.sample_rate();

        let mut binding = self.backend.open_device(decoder)?;
        binding.set_master_volume(f32::from(self.volume) / 100.0);

        self.binding = Some(binding);
        self.total_frames = total_frames;
        self.sample_rate = sample_rate;
        self.cursor = 0;
        self.current = Some(CurrentTrack {
            playlist,
            entry,
            name,
        });
        self.publish_info();
        Ok(())
    }

    fn start(&mut self) {
        if let Some(b) = self.binding.as_mut() {
            b.start();
            self.playing = true;
            self.publish_info();
        }
    }

    fn pause(&mut self) {
        if !self.playing {
            return;
        }
        if let Some(b) = self.binding.as_mut() {
            b.stop();
        }
        self.playing = false;
        self.publish_info();
    }

    fn play_pause(&mut self) -> Result<()> {
        if self.binding.is_none() {
            // Nothing loaded: begin at the head of the active playlist.
            let head = self
                .store
                .active()
                .and_then(|l| l.head().map(|h| (l.name().to_string(), h)));
            let Some((playlist, head)) = head else {
                return Ok(());
            };
            self.load(playlist, head)?;
            self.start();
            return Ok(());
        }

        if self.playing {
            self.pause();
        } else {
            self.start();
        }
        Ok(())
    }

    /// Release the device and decoder. No-op when idle.
    fn stop(&mut self) {
        if self.binding.is_none() {
            return;
        }
        if let Some(mut b) = self.binding.take() {
            // Synchronous device stop before the drop tears the pair down.
            b.stop();
        }
        self.playing = false;
        self.cursor = 0;
        self.total_frames = 0;
        self.sample_rate = 0;
        self.publish_info();
    }

    /// Reposition within the loaded track. Ignored when idle; a collaborator
    /// seek failure keeps the previous position.
    fn seek(&mut self, frame: u64) {
        let Some(b) = self.binding.as_mut() else {
            return;
        };
        match b.seek_to_frame(frame) {
            Ok(()) => {
                self.cursor = frame;
                self.publish_info();
            }
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    fn restart(&mut self) -> Result<()> {
        if self.binding.is_some() {
            self.seek(0);
            if !self.playing {
                self.start();
            }
            return Ok(());
        }

        let head = self
            .store
            .active()
            .and_then(|l| l.head().map(|h| (l.name().to_string(), h)));
        if let Some((playlist, head)) = head {
            self.load(playlist, head)?;
            self.start();
        }
        Ok(())
    }

    fn next(&mut self) -> Result<()> {
        let follow = self.current.as_ref().and_then(|c| {
            self.store
                .get(&c.playlist)
                .and_then(|l| l.next(c.entry))
                .map(|id| (c.playlist.clone(), id))
        });

        match follow {
            Some((playlist, id)) => {
                self.load(playlist, id)?;
                self.start();
            }
            None => {
                let had_current = self.current.is_some();
                self.stop();
                if had_current {
                    let _ = self.events.send(EngineEvent::PlaylistEnded);
                }
            }
        }
        Ok(())
    }

    fn previous(&mut self) -> Result<()> {
        let follow = self.current.as_ref().and_then(|c| {
            self.store
                .get(&c.playlist)
                .and_then(|l| l.prev(c.entry))
                .map(|id| (c.playlist.clone(), id))
        });

        if let Some((playlist, id)) = follow {
            self.load(playlist, id)?;
            self.start();
        }
        Ok(())
    }

    fn play_index(&mut self, index: usize) -> Result<()> {
        let target = self
            .store
            .active()
            .and_then(|l| l.entry_at(index).map(|id| (l.name().to_string(), id)));
        let Some((playlist, id)) = target else {
            return Ok(());
        };
        self.load(playlist, id)?;
        self.start();
        Ok(())
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = level.min(100);
        if let Some(b) = self.binding.as_mut() {
            b.set_master_volume(f32::from(self.volume) / 100.0);
        }
        self.publish_info();
    }

    fn create_playlist(&mut self, name: &str, icon: Option<PathBuf>) -> Result<()> {
        self.store.create(name, icon)?;
        // A freshly created playlist becomes the one on screen.
        self.select_playlist(name)
    }

    fn rename_playlist(&mut self, old: &str, new: &str) -> Result<()> {
        self.store.rename(old, new)?;
        if let Some(c) = self.current.as_mut() {
            if c.playlist == old {
                c.playlist = new.to_string();
            }
        }
        self.publish_view();
        Ok(())
    }

    fn append_track(&mut self, playlist: &str, name: &str, path: PathBuf) -> Result<()> {
        let position = self.store.append_track(playlist, name, path)?;
        if self.store.active_name() == Some(playlist) {
            let _ = self.events.send(EngineEvent::TrackAdded {
                name: name.to_string(),
                position,
            });
            self.publish_view();
        }
        Ok(())
    }

    fn remove_track(&mut self, playlist: &str, name: &str) -> Result<()> {
        let removed = self.store.remove_track(playlist, name)?;

        let was_current = self
            .current
            .as_ref()
            .is_some_and(|c| c.playlist == playlist && c.entry == removed);
        if was_current {
            self.stop();
            self.current = None;
            self.publish_info();
        }

        if self.store.active_name() == Some(playlist) {
            self.publish_view();
        }
        Ok(())
    }

    fn select_playlist(&mut self, name: &str) -> Result<()> {
        self.store.set_active(name)?;
        self.stop();
        self.current = None;
        self.publish_info();
        self.publish_view();
        Ok(())
    }

    fn publish_info(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.track = self.current.as_ref().map(|c| c.name.clone());
            info.loaded = self.binding.is_some();
            info.playing = self.playing;
            info.cursor_frames = self.cursor;
            info.total_frames = self.total_frames;
            info.sample_rate = self.sample_rate;
            info.volume = self.volume;
        }
    }

    /// Push a fresh snapshot of the store to the frontend.
    pub fn publish_view(&self) {
        let view = StoreView {
            playlists: self.store.names(),
            active: self.store.active_name().map(str::to_string),
            tracks: self.store.active().map(|l| l.names()).unwrap_or_default(),
        };
        let _ = self.events.send(EngineEvent::View(view));
    }
}
