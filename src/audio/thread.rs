use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::PlaybackSettings;
use crate::playlist::PlaylistStore;

use super::backend::RodioBackend;
use super::engine::Engine;
use super::types::{EngineCmd, EngineEvent, PlaybackHandle};

/// Spawn the engine thread. The rodio backend is created inside the thread
/// (the output stream is not `Send`), and `recv_timeout` doubles as the
/// position-poll tick: a quiet channel means it is time to read the cursor.
pub(super) fn spawn_engine_thread(
    store: PlaylistStore,
    settings: PlaybackSettings,
    rx: Receiver<EngineCmd>,
    events: Sender<EngineEvent>,
    info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let backend = RodioBackend::new();
        let mut engine = Engine::new(
            backend,
            store,
            settings.volume,
            settings.end_threshold_frames,
            events,
            info,
        );
        engine.publish_view();

        let poll = Duration::from_millis(settings.poll_interval_ms.max(1));
        loop {
            match rx.recv_timeout(poll) {
                Ok(cmd) => {
                    debug!(cmd = ?cmd, "engine command");
                    if !engine.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("engine thread exiting");
    })
}
