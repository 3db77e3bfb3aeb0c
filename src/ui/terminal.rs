//! Interactive terminal front end for the settings views.
//!
//! Renders the mount container, routes key presses to the focused widget and runs
//! at most one backend request at a time on the tokio runtime, rendering while it
//! is outstanding.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::backend::{dispatch, Backend, BackendError, Request, RequestKind, Response};
use crate::ui::{render, Container, Document, MOUNT_ID};
use crate::views::{Mounted, MountedView};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What a key press means to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    FocusNext,
    FocusPrev,
    Activate,
    Edit,
}

fn key_action(key: &KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Tab | KeyCode::Down => KeyAction::FocusNext,
        KeyCode::BackTab | KeyCode::Up => KeyAction::FocusPrev,
        KeyCode::Enter => KeyAction::Activate,
        _ => KeyAction::Edit,
    }
}

/// A request running on the runtime.
struct InFlight {
    kind: RequestKind,
    handle: JoinHandle<Response>,
}

fn start<B: Backend>(backend: &B, request: Request) -> InFlight {
    let kind = request.kind();
    tracing::debug!("Starting {:?} request", kind);
    let backend = backend.clone();
    let handle = tokio::spawn(async move { dispatch(&backend, request).await });
    InFlight { kind, handle }
}

/// Applies Enter on the focused widget.
///
/// Returns the request to start, if any. A request emitted while another is
/// outstanding is dropped; the view keeps waiting for the running one.
fn activate(view: &mut MountedView, container: &mut Container, busy: bool) -> Option<Request> {
    let event = container.activate_focused()?;
    let request = view.handle(container, event)?;
    if busy {
        tracing::warn!("Dropping {:?} request: another request is running", request.kind());
        return None;
    }
    Some(request)
}

/// Forwards a key press to the focused input when the view allows editing.
fn edit(view: &MountedView, container: &mut Container, event: &Event) -> bool {
    view.accepts_edits() && container.edit_focused(event)
}

pub struct SettingsTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    cleaned_up: bool,
}

impl SettingsTui {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            cleaned_up: false,
        })
    }

    /// Runs the mounted view until the user quits.
    ///
    /// Requests are never cancelled; quitting with one outstanding simply drops it.
    pub async fn run<B: Backend>(
        &mut self,
        document: &mut Document,
        mounted: Mounted,
        backend: &B,
    ) -> Result<()> {
        let Mounted { mut view, initial } = mounted;
        let container = document.container_mut(MOUNT_ID)?;
        let mut in_flight = initial.map(|request| start(backend, request));

        loop {
            let title = view.title();
            self.terminal
                .draw(|frame| render::draw(frame, title, &*container))?;

            if in_flight.as_ref().is_some_and(|f| f.handle.is_finished()) {
                if let Some(finished) = in_flight.take() {
                    let response = match finished.handle.await {
                        Ok(response) => response,
                        Err(e) => {
                            tracing::error!("{:?} request task failed: {}", finished.kind, e);
                            finished
                                .kind
                                .failed(BackendError::Transport(e.to_string()))
                        }
                    };
                    view.complete(container, response);
                    continue;
                }
            }

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key_action(&key) {
                KeyAction::Quit => {
                    if let Some(f) = &in_flight {
                        tracing::info!("Quitting with {:?} request still outstanding", f.kind);
                    }
                    break;
                }
                KeyAction::FocusNext => container.focus_next(),
                KeyAction::FocusPrev => container.focus_prev(),
                KeyAction::Activate => {
                    if let Some(request) = activate(&mut view, container, in_flight.is_some()) {
                        in_flight = Some(start(backend, request));
                    }
                }
                KeyAction::Edit => {
                    edit(&view, container, &Event::Key(key));
                }
            }
        }

        self.cleanup()
    }

    /// Restores the terminal.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for SettingsTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
