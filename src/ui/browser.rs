//! Movie list and featured banner
//!
//! Used by the home and favorites screens. Each row shows the heart, title,
//! year and vote average of one card.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::ListState;
use crate::controllers::MovieCard;
use crate::models::MovieRecord;
use crate::ui::theme::{heart, Theme};

/// A titled list of movie cards
pub struct BrowserView<'a> {
    pub cards: &'a [MovieCard],
    pub list: &'a ListState,
    pub title: &'a str,
    /// Shown instead of the list when there are no cards
    pub empty_message: &'a str,
    pub focused: bool,
}

impl<'a> BrowserView<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        if self.cards.is_empty() {
            let empty = Paragraph::new(self.empty_message)
                .style(Theme::dimmed())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(border_style)
                        .title(Span::styled(format!(" {} ", self.title), Theme::title())),
                );
            frame.render_widget(empty, area);
            return;
        }

        let visible = area.height.saturating_sub(2) as usize;
        let start = self.list.window_start(visible);
        let items: Vec<ListItem> = self
            .cards
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .map(|(i, card)| ListItem::new(card_line(card, i == self.list.selected)))
            .collect();

        let title = format!(
            " {} ({}/{}) ",
            self.title,
            self.list.selected + 1,
            self.cards.len()
        );
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(Span::styled(title, Theme::title())),
        );
        frame.render_widget(list, area);
    }
}

/// One row: `▸ ♥ Title (Year)  ★ 8.4`
pub fn card_line(card: &MovieCard, selected: bool) -> Line<'static> {
    let movie = &card.movie;
    let marker = if selected { "▸ " } else { "  " };
    let favorite = card.is_favorite();
    let title_style = if selected {
        Theme::list_item_selected()
    } else {
        Theme::text()
    };

    let mut spans = vec![
        Span::styled(marker, Theme::title()),
        Span::styled(
            format!("{} ", heart(favorite)),
            if favorite { Theme::favorite() } else { Theme::dimmed() },
        ),
        Span::styled(movie.title.clone(), title_style),
    ];
    if let Some(year) = movie.year() {
        spans.push(Span::styled(format!(" ({})", year), Theme::year()));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("★ {:.1}", movie.vote_average),
        Theme::rating(movie.vote_average),
    ));
    Line::from(spans)
}

/// Banner for the featured movie above the popular list
pub fn render_featured(frame: &mut Frame, area: Rect, movie: &MovieRecord, image_base: &str) {
    let mut heading = vec![Span::styled(movie.title.clone(), Theme::title())];
    if let Some(year) = movie.year() {
        heading.push(Span::styled(format!(" ({})", year), Theme::year()));
    }
    heading.push(Span::raw("  "));
    heading.push(Span::styled(
        format!("★ {:.1}", movie.vote_average),
        Theme::rating(movie.vote_average),
    ));

    let artwork = match movie.hero_url(image_base).url() {
        Some(url) => Span::styled(url.to_string(), Theme::dimmed()),
        None => Span::styled("[no artwork]", Theme::dimmed()),
    };

    let lines = vec![
        Line::from(heading),
        Line::from(Span::styled(movie.overview.clone(), Theme::text())),
        Line::from(artwork),
    ];

    let banner = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::border())
            .title(Span::styled(" FEATURED ", Theme::title())),
    );
    frame.render_widget(banner, area);
}
