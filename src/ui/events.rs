use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum AppEvent {
    // UI events
    Quit,
    Tick,
    Render,

    // Transport events
    TogglePlayPause,
    Stop,
    NextTrack,
    PreviousTrack,

    // Navigation events
    Up,
    Down,
    Enter,

    // Volume events
    VolumeUp,
    VolumeDown,

    // Playlist events
    AddMedia,
    ClearPlaylist,
}

pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
    tick_interval: Duration,
}

impl EventHandler {
    pub fn new(tick_interval: Duration) -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
            tick_interval,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_sender.clone()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_receiver.recv().await
    }

    /// Forward terminal key presses into the app channel and emit a tick
    /// on every pass. Runs until the channel closes.
    pub async fn pump_terminal_events(
        sender: mpsc::UnboundedSender<AppEvent>,
        tick_interval: Duration,
    ) -> Result<()> {
        loop {
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            if let Some(app_event) = key_to_app_event(key) {
                                if sender.send(app_event).is_err() {
                                    return Ok(());
                                }
                            }
                        }
                    }
                    Event::Resize(_, _) => {
                        let _ = sender.send(AppEvent::Render);
                    }
                    _ => {}
                }
            }

            if sender.send(AppEvent::Tick).is_err() {
                return Ok(());
            }
            tokio::time::sleep(tick_interval).await;
        }
    }
}

fn key_to_app_event(key: KeyEvent) -> Option<AppEvent> {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),

        // Transport
        KeyCode::Char(' ') => Some(AppEvent::TogglePlayPause),
        KeyCode::Char('s') => Some(AppEvent::Stop),
        KeyCode::Char('n') | KeyCode::Right => Some(AppEvent::NextTrack),
        KeyCode::Char('b') | KeyCode::Left => Some(AppEvent::PreviousTrack),

        // Navigation
        KeyCode::Up => Some(AppEvent::Up),
        KeyCode::Down => Some(AppEvent::Down),
        KeyCode::Enter => Some(AppEvent::Enter),

        // Volume
        KeyCode::Char('+') | KeyCode::Char('=') => Some(AppEvent::VolumeUp),
        KeyCode::Char('-') => Some(AppEvent::VolumeDown),

        // Playlist
        KeyCode::Char('a') | KeyCode::F(5) => Some(AppEvent::AddMedia),
        KeyCode::Char('c') => Some(AppEvent::ClearPlaylist),

        _ => None,
    }
}
