use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::ControlCmd;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let log_path = crate::logging::init();
    let settings = settings::load_settings();
    if let Some(path) = &log_path {
        info!(path = %path.display(), "segue starting");
    }

    let (store, scan_note) = startup::build_store(&settings);
    let (player, engine_events) = AudioPlayer::new(store, settings.playback.clone());

    let mut app = App::new();
    app.set_playback_handle(player.playback_handle());
    app.set_status(scan_note);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &player,
            &engine_events,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Engine shutdown joins the audio thread; do it after the terminal is
    // back to normal so a stuck device cannot leave the screen broken.
    player.quit();

    run_result
}
