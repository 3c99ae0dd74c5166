use std::time::Duration;

use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::warn;

use super::{AppEvent, EventHandler, TerminalManager};
use crate::config::Config;
use crate::media::{MediaKind, MediaScanner};
use crate::player::{AudioBackend, PlaybackSession, PlaybackStatus, VideoBackend};

/// The transport layer: owns the session and wires UI events to its
/// operations. No playback logic lives here.
pub struct App {
    config: Config,
    terminal: TerminalManager,
    events: EventHandler,
    session: PlaybackSession<AudioBackend, VideoBackend>,
    scanner: MediaScanner,
    list_state: ListState,
    status_line: String,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        session: PlaybackSession<AudioBackend, VideoBackend>,
    ) -> Result<Self> {
        let terminal = TerminalManager::new()?;
        let events = EventHandler::new(Duration::from_millis(config.player.tick_interval_ms));

        let mut list_state = ListState::default();
        if !session.playlist().is_empty() {
            list_state.select(Some(0));
        }

        Ok(Self {
            config,
            terminal,
            events,
            session,
            scanner: MediaScanner::new(),
            list_state,
            status_line: String::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let sender = self.events.sender();
        let tick = self.events.tick_interval();
        tokio::spawn(async move {
            if let Err(err) = EventHandler::pump_terminal_events(sender, tick).await {
                warn!(error = %err, "terminal event pump stopped");
            }
        });

        while !self.should_quit {
            self.draw()?;
            if let Some(event) = self.events.next_event().await {
                self.handle_event(event);
            }
        }

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let session = &self.session;
        let position = session.position();
        let status_line = self.status_line.clone();
        let mut list_state = self.list_state.clone();

        self.terminal.draw(|f| {
            Self::render_ui(f, session, position, &status_line, &mut list_state);
        })?;

        self.list_state = list_state;
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.should_quit = true;
            }
            AppEvent::Tick => {
                let before = self.session.current_index();
                if let Err(err) = self.session.poll_finished(self.config.media.auto_play_next) {
                    self.notice(err.to_string());
                }
                if self.session.current_index() != before {
                    self.select_current();
                }
            }
            AppEvent::Render => {}
            AppEvent::TogglePlayPause => {
                if let Err(err) = self.session.toggle() {
                    self.notice(err.to_string());
                }
            }
            AppEvent::Stop => {
                self.session.stop();
                self.status_line.clear();
            }
            AppEvent::NextTrack => {
                if let Err(err) = self.session.next() {
                    self.notice(err.to_string());
                }
                self.select_current();
            }
            AppEvent::PreviousTrack => {
                if let Err(err) = self.session.previous() {
                    self.notice(err.to_string());
                }
                self.select_current();
            }
            AppEvent::Up => self.move_selection(-1),
            AppEvent::Down => self.move_selection(1),
            AppEvent::Enter => {
                if let Some(selected) = self.list_state.selected() {
                    if let Err(err) = self.session.play(Some(selected)) {
                        self.notice(err.to_string());
                    }
                }
            }
            AppEvent::VolumeUp => {
                let volume = self.session.volume() as i32 + 5;
                self.session.set_volume(volume);
            }
            AppEvent::VolumeDown => {
                let volume = self.session.volume() as i32 - 5;
                self.session.set_volume(volume);
            }
            AppEvent::AddMedia => {
                let was_empty = self.session.playlist().is_empty();
                let found = self.scanner.scan_directories(&self.config.media_directories);
                let added = self.session.add_paths(found);
                self.notice(format!("Added {added} media files"));
                if was_empty && !self.session.playlist().is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            AppEvent::ClearPlaylist => {
                self.session.clear();
                self.list_state.select(None);
                self.notice("Playlist cleared");
            }
        }
    }

    fn notice(&mut self, message: impl Into<String>) {
        self.status_line = message.into();
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.session.playlist().len();
        if len == 0 {
            return;
        }

        let current = self.list_state.selected().unwrap_or(0);
        let new_index = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (current + delta as usize).min(len - 1)
        };

        self.list_state.select(Some(new_index));
    }

    fn select_current(&mut self) {
        if !self.session.playlist().is_empty() {
            self.list_state.select(Some(self.session.current_index()));
        }
    }

    fn render_ui(
        f: &mut Frame,
        session: &PlaybackSession<AudioBackend, VideoBackend>,
        position: Duration,
        status_line: &str,
        list_state: &mut ListState,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Playlist
                Constraint::Length(3), // Now playing
                Constraint::Length(3), // Controls
            ])
            .split(f.area());

        Self::render_header(f, chunks[0], session);
        Self::render_playlist(f, chunks[1], session, list_state);
        Self::render_now_playing(f, chunks[2], session, position);
        Self::render_controls(f, chunks[3], session, status_line);
    }

    fn render_header(
        f: &mut Frame,
        area: Rect,
        session: &PlaybackSession<AudioBackend, VideoBackend>,
    ) {
        let video_hint = if session.video_available() {
            ""
        } else {
            " (audio only: no video engine)"
        };
        let title = Paragraph::new(format!(
            "Mbox Player - {} tracks{video_hint}",
            session.playlist().len()
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

        f.render_widget(title, area);
    }

    fn render_playlist(
        f: &mut Frame,
        area: Rect,
        session: &PlaybackSession<AudioBackend, VideoBackend>,
        list_state: &mut ListState,
    ) {
        let engaged = !matches!(session.status(), PlaybackStatus::Stopped);

        let items: Vec<ListItem> = session
            .playlist()
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let is_current = engaged && i == session.current_index();
                let prefix = if is_current { "♪ " } else { "  " };
                let badge = match track.kind {
                    MediaKind::Audio => "[A]",
                    MediaKind::Video => "[V]",
                };

                let mut content = format!("{prefix}{badge} {}", track.display_title());
                if let Some(artist) = &track.artist {
                    content.push_str(" - ");
                    content.push_str(artist);
                }

                let style = if is_current {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(content).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Playlist"))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, list_state);
    }

    fn render_now_playing(
        f: &mut Frame,
        area: Rect,
        session: &PlaybackSession<AudioBackend, VideoBackend>,
        position: Duration,
    ) {
        let (label, ratio) = match session.current_track() {
            Some(track) if !matches!(session.status(), PlaybackStatus::Stopped) => {
                let elapsed = format_duration(position);
                match track.duration {
                    Some(total) if !total.is_zero() => {
                        let ratio =
                            (position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
                        (
                            format!(
                                "{}  {elapsed} / {}",
                                track.display_title(),
                                format_duration(total)
                            ),
                            ratio,
                        )
                    }
                    _ => (format!("{}  {elapsed}", track.display_title()), 0.0),
                }
            }
            _ => ("No track playing".to_string(), 0.0),
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Now Playing"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio)
            .label(label);

        f.render_widget(gauge, area);
    }

    fn render_controls(
        f: &mut Frame,
        area: Rect,
        session: &PlaybackSession<AudioBackend, VideoBackend>,
        status_line: &str,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35), // Status
                Constraint::Percentage(20), // Volume
                Constraint::Percentage(45), // Key hints
            ])
            .split(area);

        let state_text = match session.status() {
            PlaybackStatus::Playing => "▶ Playing",
            PlaybackStatus::Paused => "⏸ Paused",
            PlaybackStatus::Stopped => "⏹ Stopped",
            PlaybackStatus::Unsupported => "✖ Unsupported",
        };
        let status = if status_line.is_empty() {
            state_text.to_string()
        } else {
            format!("{state_text} | {status_line}")
        };
        let status_widget = Paragraph::new(status)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status_widget, chunks[0]);

        let volume_widget = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Volume"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(session.volume() as f64 / 100.0)
            .label(format!("{}%", session.volume()));
        f.render_widget(volume_widget, chunks[1]);

        let hints = Paragraph::new("space play/pause  s stop  n/b skip  +/- volume  a add  c clear  q quit")
            .block(Block::default().borders(Borders::ALL).title("Keys"));
        f.render_widget(hints, chunks[2]);
    }
}

fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
