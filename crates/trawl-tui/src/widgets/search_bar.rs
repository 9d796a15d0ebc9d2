//! Search bar widget: the single `type:value, type:value` text input, with
//! the confirmed selection shown as chips underneath.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` / `Delete` remove the character before / after the cursor.
//! - `Cursor(..)` moves the cursor by one character or to either end.
//!
//! After every edit the app shell forwards the new text and cursor to the
//! search session, and copies the session's text back after a confirmation.

use std::ops::Range;

use crate::event::{AppEvent, CursorMove};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use trawl_core::SelectionSet;

const PLACEHOLDER: &str = "flag:Spain, rfmo:IOTC, vessel:…   (? for help)";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchBarState {
    pub text: String,
    /// Byte offset of the cursor within `text`.
    pub cursor: usize,
}

impl SearchBarState {
    /// Apply an editing event. Returns true when text or cursor changed.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.text.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                true
            }
            AppEvent::Backspace => match self.prev_boundary() {
                Some(prev) => {
                    self.text.remove(prev);
                    self.cursor = prev;
                    true
                }
                None => false,
            },
            AppEvent::Delete => {
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                    true
                } else {
                    false
                }
            }
            AppEvent::Cursor(movement) => {
                let target = match movement {
                    CursorMove::Left => self.prev_boundary().unwrap_or(0),
                    CursorMove::Right => self.next_boundary(),
                    CursorMove::Home => 0,
                    CursorMove::End => self.text.len(),
                };
                let moved = target != self.cursor;
                self.cursor = target;
                moved
            }
            _ => false,
        }
    }

    /// Replace the buffer, e.g. with the text the session wrote after a
    /// confirmation.
    pub fn set(&mut self, text: &str, cursor: usize) {
        if self.text != text {
            self.text = text.to_string();
        }
        self.cursor = cursor.min(self.text.len());
        tracing::trace!(text = %self.text, cursor = self.cursor, "search bar synced");
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().last().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len())
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SearchBar<'a> {
    state: &'a SearchBarState,
    selection: &'a SelectionSet,
    /// Byte range of the token under the cursor.
    active: Range<usize>,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(
        state: &'a SearchBarState,
        selection: &'a SelectionSet,
        active: Range<usize>,
        loading: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            selection,
            active,
            loading,
            theme,
        }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        // The block adds 1-cell borders; text starts at (area.x+1, area.y+1).
        let col = self.state.text[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(2));
        let y = area.y + 1;
        (x, y)
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::bordered()
            .title(" Search ")
            .border_style(self.theme.border_focused);
        if self.loading {
            block = block.title_top(Line::from(Span::styled(" searching… ", self.theme.loading)).right_aligned());
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let text = self.state.text.as_str();
        let input = if text.is_empty() {
            Line::from(Span::styled(PLACEHOLDER, self.theme.placeholder))
        } else {
            let start = self.active.start.min(text.len());
            let end = self.active.end.clamp(start, text.len());
            Line::from(vec![
                Span::raw(&text[..start]),
                Span::styled(&text[start..end], self.theme.active_token),
                Span::raw(&text[end..]),
            ])
        };

        let chips: Vec<Span> = self
            .selection
            .iter()
            .flat_map(|item| {
                [
                    Span::styled(format!(" {} ", item), self.theme.chip),
                    Span::raw(" "),
                ]
            })
            .collect();

        Paragraph::new(vec![input, Line::from(chips)]).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
