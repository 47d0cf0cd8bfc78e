use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackState, PromptKind};
use crate::audio::{AudioPlayer, EngineCmd, EngineEvent};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Last-known title as emitted to MPRIS.
    pub last_mpris_title: Option<String>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
    /// Last-known volume as emitted to MPRIS.
    pub last_mpris_volume: u8,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            last_mpris_title: None,
            last_mpris_playback: app.playback,
            last_mpris_volume: 0,
        }
    }
}

/// Main terminal event loop: drains engine notifications, syncs the shared
/// playback snapshot and MPRIS, draws, and dispatches input. Returns
/// `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &AudioPlayer,
    engine_events: &Receiver<EngineEvent>,
    mpris: &MprisHandle,
    control_tx: &Sender<ControlCmd>,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(event) = engine_events.try_recv() {
            apply_engine_event(app, event);
        }

        // Sync playback state from the engine's shared snapshot.
        let mut title: Option<String> = None;
        let mut volume = state.last_mpris_volume;
        if let Some(handle) = app.playback_handle.as_ref().cloned() {
            if let Ok(info) = handle.lock() {
                app.sync_playback(&info);
                title = info.track.clone();
                volume = info.volume;
            }
        }

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        if title != state.last_mpris_title
            || app.playback != state.last_mpris_playback
            || volume != state.last_mpris_volume
        {
            mpris.set_title(title.clone());
            mpris.set_playback(app.playback);
            mpris.set_volume(volume);
            state.last_mpris_title = title;
            state.last_mpris_playback = app.playback;
            state.last_mpris_volume = volume;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, player) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, control_tx) {
                    return Ok(());
                }
            }
        }
    }
}

fn apply_engine_event(app: &mut App, event: EngineEvent) {
    match event {
        EngineEvent::View(view) => app.apply_view(view),
        EngineEvent::TrackAdded { name, position } => {
            app.set_status(format!("Added \"{name}\" at position {position}"));
        }
        EngineEvent::PlaylistEnded => app.set_status("Playlist ended"),
        EngineEvent::Error(e) => app.set_status(e.to_string()),
    }
}

/// Returns `true` when the application should quit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App, player: &AudioPlayer) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if app.playback != PlaybackState::Playing {
                let _ = player.send(EngineCmd::PlayPause);
            }
        }
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = player.send(EngineCmd::PlayPause);
            }
        }
        ControlCmd::PlayPause => {
            let _ = player.send(EngineCmd::PlayPause);
        }
        ControlCmd::Stop => {
            let _ = player.send(EngineCmd::Stop);
        }
        ControlCmd::Next => {
            let _ = player.send(EngineCmd::Next);
        }
        ControlCmd::Prev => {
            let _ = player.send(EngineCmd::Prev);
        }
        ControlCmd::SetVolume(level) => {
            let _ = player.send(EngineCmd::SetVolume(level));
        }
    }
    false
}

/// Returns `true` when the application should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &AudioPlayer,
    control_tx: &Sender<ControlCmd>,
) -> bool {
    if app.prompt.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => submit_prompt(app, player),
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('s') => {
            let _ = player.send(EngineCmd::Stop);
        }
        KeyCode::Char('n') => {
            let _ = player.send(EngineCmd::Next);
        }
        KeyCode::Char('b') => {
            let _ = player.send(EngineCmd::Prev);
        }
        KeyCode::Char('r') => {
            let _ = player.send(EngineCmd::Restart);
        }
        KeyCode::Left => scrub(app, player, settings, -1),
        KeyCode::Right => scrub(app, player, settings, 1),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            step_volume(app, player, i16::from(settings.controls.volume_step));
        }
        KeyCode::Char('-') => {
            step_volume(app, player, -i16::from(settings.controls.volume_step));
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if app.has_tracks() {
                let _ = player.send(EngineCmd::PlayIndex(app.selected));
            }
        }
        KeyCode::Tab => {
            if let Some(name) = app.playlist_after_active() {
                let _ = player.send(EngineCmd::SelectPlaylist(name));
            }
        }
        KeyCode::Char('c') => app.open_prompt(PromptKind::CreatePlaylist),
        KeyCode::Char('R') => {
            if app.active.is_some() {
                app.open_prompt(PromptKind::RenamePlaylist);
            }
        }
        KeyCode::Char('a') => {
            if app.active.is_some() {
                app.open_prompt(PromptKind::AddTrack);
            }
        }
        KeyCode::Char('d') => {
            if let (Some(playlist), Some(name)) = (
                app.active.clone(),
                app.selected_track_name().map(str::to_string),
            ) {
                let _ = player.send(EngineCmd::RemoveTrack { playlist, name });
            }
        }
        _ => {}
    }

    false
}

fn submit_prompt(app: &mut App, player: &AudioPlayer) {
    let Some(prompt) = app.take_prompt() else {
        return;
    };
    let input = prompt.input.trim().to_string();
    if input.is_empty() {
        return;
    }

    match prompt.kind {
        PromptKind::CreatePlaylist => {
            let _ = player.send(EngineCmd::CreatePlaylist {
                name: input,
                icon: None,
            });
        }
        PromptKind::RenamePlaylist => {
            if let Some(old) = app.active.clone() {
                let _ = player.send(EngineCmd::RenamePlaylist { old, new: input });
            }
        }
        PromptKind::AddTrack => {
            if let Some(playlist) = app.active.clone() {
                let path = PathBuf::from(input);
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("UNKNOWN")
                    .to_string();
                let _ = player.send(EngineCmd::AppendTrack {
                    playlist,
                    name,
                    path,
                });
            }
        }
    }
}

/// Relative seek by the configured scrub step, clamped to the track bounds.
fn scrub(app: &App, player: &AudioPlayer, settings: &config::Settings, direction: i64) {
    let Some(handle) = app.playback_handle.as_ref() else {
        return;
    };
    let Ok(info) = handle.lock() else {
        return;
    };
    if !info.loaded || info.sample_rate == 0 {
        return;
    }

    let step = (settings.controls.scrub_seconds * u64::from(info.sample_rate)) as i64;
    let target = info.cursor_frames as i64 + direction * step;
    let target = target.clamp(0, info.total_frames as i64) as u64;
    drop(info);

    let _ = player.send(EngineCmd::Seek(target));
}

fn step_volume(app: &App, player: &AudioPlayer, delta: i16) {
    let Some(handle) = app.playback_handle.as_ref() else {
        return;
    };
    let current = handle.lock().map(|info| info.volume).unwrap_or(0);
    let level = (i16::from(current) + delta).clamp(0, 100) as u8;
    let _ = player.send(EngineCmd::SetVolume(level));
}
