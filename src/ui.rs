//! UI rendering for the terminal frontend.
//!
//! Everything here is read-only over the `App` model and the shared
//! playback snapshot; all mutations go through the command channels.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, PlaybackState, PromptKind};
use crate::audio::PlaybackInfo;
use crate::config::UiSettings;

const CONTROLS: &str = "[space/p] play/pause | [s] stop | [b/n] prev/next | [r] restart | \
[←/→] seek | [-/+] volume | [j/k] select | [enter] play selected | [tab] playlist | \
[c] create | [R] rename | [a] add | [d] delete | [q] quit";

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let info = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()))
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" segue ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box: transport line + one-shot message.
    let status_par = Paragraph::new(status_text(app, &info))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Seek bar over the full track range.
    let ratio = if info.total_frames > 0 {
        (info.cursor_frames as f64 / info.total_frames as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .ratio(ratio)
        .label(format!("{} / {}", info.elapsed_text(), info.total_text()));
    frame.render_widget(gauge, chunks[2]);

    // Track list of the active playlist.
    let items: Vec<ListItem> = app
        .display_lines()
        .into_iter()
        .map(ListItem::new)
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ratatui::widgets::ListState::default();
    if app.has_tracks() {
        list_state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, chunks[3], &mut list_state);

    // Playlist selector line, active name bracketed.
    let playlists = app
        .playlists
        .iter()
        .map(|name| {
            if app.active.as_deref() == Some(name.as_str()) {
                format!("[{name}]")
            } else {
                name.clone()
            }
        })
        .collect::<Vec<String>>()
        .join("  ");
    let playlists_par = Paragraph::new(playlists).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" playlists ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(playlists_par, chunks[4]);

    // Footer
    let footer = Paragraph::new(CONTROLS)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    // Prompt popup on top of the track list.
    if let Some(prompt) = &app.prompt {
        let title = match prompt.kind {
            PromptKind::CreatePlaylist => " new playlist name (enter/esc) ",
            PromptKind::RenamePlaylist => " rename playlist (enter/esc) ",
            PromptKind::AddTrack => " audio file path (enter/esc) ",
        };
        let popup_area = centered_rect_sized(60, 3, chunks[3]);
        frame.render_widget(Clear, popup_area);
        let input = Paragraph::new(format!("{}█", prompt.input))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(input, popup_area);
    }
}

fn status_text(app: &App, info: &PlaybackInfo) -> String {
    let mut parts: Vec<String> = Vec::new();

    match (app.playback, info.track.as_deref()) {
        (PlaybackState::Playing, Some(track)) => {
            parts.push(format!(
                "Playing: {track} [{} / {}]",
                info.elapsed_text(),
                info.total_text()
            ));
        }
        (PlaybackState::Paused, Some(track)) => {
            parts.push(format!(
                "Paused: {track} [{} / {}]",
                info.elapsed_text(),
                info.total_text()
            ));
        }
        _ => parts.push("Stopped".to_string()),
    }

    parts.push(format!("Vol {}%", info.volume));

    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}
