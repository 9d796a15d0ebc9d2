//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Usage
//!
//! In the main event loop, call [`to_app_event`] on every [`crossterm::event::Event`]
//! and match on the returned [`AppEvent`] instead of crossterm types.
//!
//! # Keybindings
//!
//! The search bar always has focus, so every printable character is text
//! except `?`, which no catalog label contains.
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `Ctrl+c`                | `Quit`                     |
//! | `Esc`                   | `Escape`                   |
//! | `Enter`                 | `Confirm`                  |
//! | `Tab`                   | `ConfirmBare`              |
//! | `↑` / `Ctrl+p`          | `Highlight(Up)`            |
//! | `↓` / `Ctrl+n`          | `Highlight(Down)`          |
//! | `←` / `→`               | `Cursor(Left/Right)`       |
//! | `Home` / `Ctrl+a`       | `Cursor(Home)`             |
//! | `End` / `Ctrl+e`        | `Cursor(End)`              |
//! | `?`                     | `ToggleHelp`               |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Delete`                | `Delete`                   |
//! | terminal resize         | `Resize(w, h)`             |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

/// Highlight movement within the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Text-cursor movement within the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Home,
    End,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Close the help popup, or quit when nothing is open.
    Escape,
    /// Confirm the highlighted candidate, leaving a trailing space.
    Confirm,
    /// Confirm the highlighted candidate without a trailing separator.
    ConfirmBare,
    Highlight(Direction),
    Cursor(CursorMove),
    ToggleHelp,
    /// A printable character for the search bar.
    Char(char),
    Backspace,
    Delete,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`].
///
/// Returns `None` for events that carry no semantic meaning for the
/// application (mouse events, focus changes, unbound keys).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Esc => Some(AppEvent::Escape),

        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Confirm),
        Tab if key.modifiers == Mod::NONE => Some(AppEvent::ConfirmBare),

        Up => Some(AppEvent::Highlight(Direction::Up)),
        Down => Some(AppEvent::Highlight(Direction::Down)),
        Char('p') if key.modifiers == Mod::CONTROL => Some(AppEvent::Highlight(Direction::Up)),
        Char('n') if key.modifiers == Mod::CONTROL => Some(AppEvent::Highlight(Direction::Down)),

        Left => Some(AppEvent::Cursor(CursorMove::Left)),
        Right => Some(AppEvent::Cursor(CursorMove::Right)),
        Home => Some(AppEvent::Cursor(CursorMove::Home)),
        End => Some(AppEvent::Cursor(CursorMove::End)),
        Char('a') if key.modifiers == Mod::CONTROL => Some(AppEvent::Cursor(CursorMove::Home)),
        Char('e') if key.modifiers == Mod::CONTROL => Some(AppEvent::Cursor(CursorMove::End)),

        Char('?') => Some(AppEvent::ToggleHelp),

        // Printable characters, shifted or not (terminals disagree on
        // whether uppercase letters carry SHIFT)
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace => Some(AppEvent::Backspace),
        Delete => Some(AppEvent::Delete),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
