use tracing::{info, warn};

use crate::config::Settings;
use crate::library;
use crate::playlist::PlaylistStore;

/// Build the store with the default playlist populated from the configured
/// base path, the way the player starts every session. Returns the store
/// plus an initial status line for the frontend.
pub fn build_store(settings: &Settings) -> (PlaylistStore, String) {
    let mut store = PlaylistStore::new();
    let name = settings.library.default_playlist.clone();
    // Only an empty name can fail here, and validation already rejected it.
    if store.create(&name, None).is_err() {
        let _ = store.create("Default", None);
    }
    let name = store.active_name().unwrap_or("Default").to_string();

    let base = &settings.library.base_path;
    if !base.is_dir() {
        warn!(path = %base.display(), "audio base path does not exist");
        return (
            store,
            format!("Audio folder not found: {}", base.display()),
        );
    }

    let mut added = 0usize;
    for track in library::scan(base, &settings.library) {
        match store.append_track(&name, &track.name, track.path) {
            Ok(_) => added += 1,
            Err(e) => warn!(error = %e, "skipping scanned file"),
        }
    }

    info!(added, playlist = %name, "startup scan complete");
    (store, format!("Loaded {added} tracks into \"{name}\""))
}
