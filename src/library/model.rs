use std::path::PathBuf;

/// One playable file discovered by the startup scan, before it becomes a
/// playlist entry.
#[derive(Debug, Clone)]
pub struct ScannedTrack {
    pub name: String,
    pub path: PathBuf,
}
