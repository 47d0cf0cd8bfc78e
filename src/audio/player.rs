use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::PlaybackSettings;
use crate::playlist::PlaylistStore;

use super::thread::spawn_engine_thread;
use super::types::{EngineCmd, EngineEvent, PlaybackHandle, PlaybackInfo};

/// Frontend-side handle to the engine thread: a command sender, the shared
/// playback snapshot, and the join handle for a clean shutdown.
pub struct AudioPlayer {
    tx: Sender<EngineCmd>,
    info: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Take ownership of the playlist store and start the engine. Returns
    /// the player plus the receiving end of the engine's event stream.
    pub fn new(store: PlaylistStore, settings: PlaybackSettings) -> (Self, Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
            volume: settings.volume.min(100),
            ..PlaybackInfo::default()
        }));

        let join = spawn_engine_thread(store, settings, rx, event_tx, info.clone());

        (
            Self {
                tx,
                info,
                join: Mutex::new(Some(join)),
            },
            event_rx,
        )
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.info.clone()
    }

    pub fn send(&self, cmd: EngineCmd) -> Result<(), mpsc::SendError<EngineCmd>> {
        self.tx.send(cmd)
    }

    /// Ask the engine to stop and wait for its thread to finish.
    pub fn quit(&self) {
        let _ = self.send(EngineCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
