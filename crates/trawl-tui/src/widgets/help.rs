//! Help popup: centred floating overlay listing the keybindings and the
//! `type:value` syntax.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    theme: &'a Theme,
    /// Field types the user can type as a prefix.
    types: &'a [String],
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme, types: &'a [String]) -> Self {
        Self { theme, types }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(72, 18, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" trawl: keybindings (? to close) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        const BINDINGS: &[(&str, &str)] = &[
            ("Enter", "Select highlighted result"),
            ("Tab", "Select without trailing space"),
            ("Space  /  ,", "Select the only result left"),
            ("↑  /  ↓", "Move highlight"),
            ("←  /  →  Home  End", "Move text cursor"),
            ("Backspace  /  Delete", "Edit; deleting a label unselects it"),
            ("?", "Toggle this help popup"),
            ("Esc  /  Ctrl+c", "Quit"),
        ];

        let mut lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<22}", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ])
            })
            .collect();

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Syntax",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::raw("  type:value, type:value   e.g. flag:Spain, rfmo:IOTC"));
        let mut types: Vec<Span> = vec![Span::raw("  types: ")];
        for t in self.types {
            types.push(Span::styled(t.clone(), self.theme.type_style(t)));
            types.push(Span::raw(" "));
        }
        lines.push(Line::from(types));

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
