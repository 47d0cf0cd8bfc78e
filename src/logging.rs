//! Tracing setup.
//!
//! The TUI owns stdout and stderr, so diagnostics go to a file under the
//! XDG state directory. `SEGUE_LOG` takes the usual env-filter syntax.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize file-backed tracing and return the log path. `None` disables
/// logging (no state directory, unwritable file); that is not fatal.
pub fn init() -> Option<PathBuf> {
    let dir = state_dir()?;
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("segue.log");
    let file = File::create(&path).ok()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("SEGUE_LOG")
                .unwrap_or_else(|_| "segue=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .init();

    Some(path)
}

fn state_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("segue"));
    }
    std::env::var_os("HOME").map(|h| {
        PathBuf::from(h)
            .join(".local")
            .join("state")
            .join("segue")
    })
}
