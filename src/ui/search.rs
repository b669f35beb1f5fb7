//! Search box in the header

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::SearchInput;
use crate::ui::Theme;

/// Search box bound to the app's input
pub struct SearchBar<'a> {
    pub input: &'a SearchInput,
    pub editing: bool,
    /// Query whose results are on screen
    pub active: Option<&'a str>,
}

impl<'a> SearchBar<'a> {
    /// Text shown inside the box
    pub fn text(&self) -> String {
        if self.editing {
            let (before, after) = self.input.query.split_at(self.input.cursor);
            format!("⌕ {}│{}", before, after)
        } else if let Some(active) = self.active {
            format!("⌕ {}  (Esc to clear)", active)
        } else {
            "⌕ Press / to search movies".to_string()
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.editing {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let style = if self.editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        };

        let paragraph = Paragraph::new(self.text()).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
        frame.render_widget(paragraph, area);
    }
}
