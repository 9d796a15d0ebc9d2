//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Remote lookups run on the
//! tokio runtime entered by the caller; their outcomes are drained once per
//! tick.

use crate::{
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        candidate_list::{CandidateList, CandidateListState},
        help::HelpPopup,
        search_bar::{SearchBar, SearchBarState},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::{io, time::Duration};
use trawl_core::{
    config::Config, confirm::PROMOTION_KEYS, parser::active_token, RemoteLookup, SearchEvent,
    SearchSession, SelectionSet,
};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState<L: RemoteLookup> {
    pub session: SearchSession<L>,
    pub search_bar: SearchBarState,
    pub results: CandidateListState,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub quit: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<L: RemoteLookup> {
    state: AppState<L>,
}

impl<L: RemoteLookup> App<L> {
    pub fn new(session: SearchSession<L>, config: Config, theme: Theme) -> Self {
        let mut search_bar = SearchBarState::default();
        let s = session.state();
        search_bar.set(&s.text, s.cursor);

        App {
            state: AppState {
                session,
                search_bar,
                results: CandidateListState::default(),
                theme,
                config,
                show_help: false,
                quit: false,
            },
        }
    }

    pub fn state(&self) -> &AppState<L> {
        &self.state
    }

    /// The selection at exit.
    pub fn into_selection(self) -> SelectionSet {
        self.state.session.selection().clone()
    }

    /// Set up the terminal, run the event loop, and restore the terminal on
    /// exit. Must be called with a tokio runtime entered.
    pub fn run(&mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        self.state.session.cancel_pending();
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.tick();
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind != crossterm::event::KeyEventKind::Press => {}
                    raw => {
                        if let Some(ev) = event::to_app_event(raw) {
                            tracing::debug!(event = ?ev, "key event");
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Merge remote outcomes that arrived since the last tick.
    pub fn tick(&mut self) {
        let s = &mut self.state;
        if s.session.poll_remote() > 0 {
            s.results.clamp(s.session.view().results.len());
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Help popup intercepts all events; only close keys pass through.
        if s.show_help {
            match event {
                AppEvent::ToggleHelp | AppEvent::Escape => {
                    tracing::debug!("help popup closed");
                    s.show_help = false;
                }
                AppEvent::Quit => s.quit = true,
                _ => {}
            }
            return;
        }

        match event {
            AppEvent::ToggleHelp => {
                tracing::debug!("help popup opened");
                s.show_help = true;
            }

            AppEvent::Quit | AppEvent::Escape => {
                tracing::debug!("quit");
                s.quit = true;
            }

            AppEvent::Confirm | AppEvent::ConfirmBare => {
                let Some(item) = s.results.selected(s.session.view().results).cloned() else {
                    return;
                };
                tracing::debug!(id = %item.id, bare = event == AppEvent::ConfirmBare, "confirm");
                let ev = if event == AppEvent::Confirm {
                    SearchEvent::ConfirmSelection(item)
                } else {
                    SearchEvent::ConfirmWithoutSeparator(item)
                };
                s.session.handle(ev);
                sync_from_session(s);
            }

            AppEvent::Highlight(_) => {
                let total = s.session.view().results.len();
                s.results.handle(&event, total);
            }

            AppEvent::Char(c) if PROMOTION_KEYS.contains(&c) => {
                if s.session.key_pressed(c) {
                    sync_from_session(s);
                } else {
                    apply_edit(s, &event);
                }
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            edit => apply_edit(s, &edit),
        }
    }
}

/// Apply an editing key to the search bar and forward the result to the
/// session.
fn apply_edit<L: RemoteLookup>(s: &mut AppState<L>, event: &AppEvent) {
    let before = s.search_bar.text.len();
    if !s.search_bar.handle(event) {
        return;
    }
    let text_changed = before != s.search_bar.text.len();
    s.session.handle(SearchEvent::TextChanged {
        text: s.search_bar.text.clone(),
        cursor: s.search_bar.cursor,
    });
    if text_changed {
        s.results.reset();
    }
}

/// Copy the session's rewritten buffer into the search bar after a
/// confirmation.
fn sync_from_session<L: RemoteLookup>(s: &mut AppState<L>) {
    let state = s.session.state();
    s.search_bar.set(&state.text, state.cursor);
    s.results.reset();
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw<L: RemoteLookup>(frame: &mut Frame, state: &AppState<L>) {
    let area = frame.area();
    let rows = state.config.ui.result_rows;

    // Vertical: search bar | results | filler | 1-line status
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(rows + 2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    let view = state.session.view();
    let settings = state.session.settings();
    let token = active_token(&state.search_bar.text, state.search_bar.cursor, &settings.field_types);

    let bar = SearchBar::new(
        &state.search_bar,
        view.selection,
        token.start..token.end,
        view.loading,
        &state.theme,
    );
    let (cx, cy) = bar.cursor_position(vert[0]);
    frame.render_widget(bar, vert[0]);

    frame.render_widget(
        CandidateList::new(
            view.results,
            &state.results,
            &settings.field_types,
            view.loading,
            &state.theme,
        ),
        vert[1],
    );

    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", state.session.phase()),
            Style::default().add_modifier(Modifier::REVERSED),
        ),
        Span::raw(format!(
            "  {} selected  ·  token: {:?}  ·  ? help",
            view.selection.len(),
            view.active_token
        )),
    ]);
    frame.render_widget(Paragraph::new(status), vert[3]);

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme, settings.field_types.known()), area);
        return;
    }

    frame.set_cursor_position((cx, cy));
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
