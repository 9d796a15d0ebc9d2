//! Candidate list widget: the ranked results below the search bar.
//!
//! One row per candidate: the field-type tag (coloured per type), then the
//! label. Candidates from the remote lookup use the theme's `remote` style.
//! The highlighted row is what Enter / Tab confirm.
//!
//! # Scroll semantics
//!
//! `highlight` is an absolute index into the current results. The visible
//! window follows it; `offset` is cached from the last render so the window
//! only moves when the highlight leaves it.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use trawl_core::{DataItem, FieldTypes};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CandidateListState {
    /// Index of the highlighted candidate.
    pub highlight: usize,
    /// First visible row, as of the last render.
    offset: Cell<usize>,
}

impl CandidateListState {
    /// Move the highlight. Wraps at both ends, like a completion menu.
    pub fn handle(&mut self, event: &AppEvent, total: usize) {
        if total == 0 {
            self.highlight = 0;
            return;
        }
        match event {
            AppEvent::Highlight(Direction::Up) => {
                self.highlight = self.highlight.checked_sub(1).unwrap_or(total - 1);
                tracing::debug!(highlight = self.highlight, "results: up");
            }
            AppEvent::Highlight(Direction::Down) => {
                self.highlight = (self.highlight + 1) % total;
                tracing::debug!(highlight = self.highlight, "results: down");
            }
            _ => {}
        }
    }

    /// Back to the top of a fresh result list.
    pub fn reset(&mut self) {
        self.highlight = 0;
        self.offset.set(0);
    }

    /// Keep the highlight inside a result list that may have shrunk.
    pub fn clamp(&mut self, total: usize) {
        if self.highlight >= total {
            self.highlight = total.saturating_sub(1);
        }
    }

    /// The highlighted candidate, if any.
    pub fn selected<'a>(&self, results: &'a [DataItem]) -> Option<&'a DataItem> {
        results.get(self.highlight)
    }

    fn window(&self, height: usize, total: usize) -> (usize, usize) {
        let height = height.max(1);
        let mut start = self.offset.get().min(total.saturating_sub(1));
        if self.highlight < start {
            start = self.highlight;
        } else if self.highlight >= start + height {
            start = self.highlight + 1 - height;
        }
        self.offset.set(start);
        (start, (start + height).min(total))
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct CandidateList<'a> {
    results: &'a [DataItem],
    state: &'a CandidateListState,
    types: &'a FieldTypes,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> CandidateList<'a> {
    pub fn new(
        results: &'a [DataItem],
        state: &'a CandidateListState,
        types: &'a FieldTypes,
        loading: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            results,
            state,
            types,
            loading,
            theme,
        }
    }
}

impl Widget for CandidateList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let total = self.results.len();
        let block = Block::bordered()
            .title(format!(" Results ({total}) "))
            .border_style(self.theme.border_unfocused);
        let inner = block.inner(area);
        block.render(area, buf);

        if total == 0 {
            let msg = if self.loading {
                Span::styled("  searching…", self.theme.loading)
            } else {
                Span::styled("  no matches", self.theme.empty)
            };
            Paragraph::new(Line::from(msg)).render(inner, buf);
            return;
        }

        let height = inner.height as usize;
        let (start, end) = self.state.window(height, total);

        let tag_width = self
            .results
            .iter()
            .map(|i| i.field_type.chars().count())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = self.results[start..end]
            .iter()
            .enumerate()
            .map(|(row, item)| {
                let label_style = if self.types.is_remote(&item.field_type) {
                    self.theme.remote
                } else {
                    Style::default()
                };
                let line = Line::from(vec![
                    Span::styled(
                        format!(" {:<tag_width$} ", item.field_type),
                        self.theme.type_style(&item.field_type),
                    ),
                    Span::styled("│ ", Style::default().add_modifier(Modifier::DIM)),
                    Span::styled(item.label.clone(), label_style),
                ]);
                if start + row == self.state.highlight {
                    line.patch_style(self.theme.highlighted)
                } else {
                    line
                }
            })
            .collect();

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };

        Paragraph::new(lines).render(text_area, buf);

        let mut sb_state = ScrollbarState::new(total)
            .position(start)
            .viewport_content_length(height);
        StatefulWidget::render(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            sb_area,
            buf,
            &mut sb_state,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
