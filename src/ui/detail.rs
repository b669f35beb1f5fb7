//! Movie detail view
//!
//! Info panel (title, meta, genres, overview) on the left, artwork and the
//! favorite control on the right.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::controllers::{DetailController, LoadingState};
use crate::models::MovieRecord;
use crate::ui::theme::{heart, Theme};

/// Borrowed view over the detail controller
pub struct DetailView<'a> {
    pub detail: &'a DetailController,
    pub image_base: &'a str,
}

impl<'a> DetailView<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match (&self.detail.movie, &self.detail.status) {
            (Some(movie), _) => self.render_movie(frame, area, movie),
            (None, LoadingState::Error(msg)) => {
                render_message(frame, area, msg, Theme::error(), Some("r: retry  Esc: back"))
            }
            (None, status) => render_message(
                frame,
                area,
                status.message().unwrap_or("Loading..."),
                Theme::loading(),
                None,
            ),
        }
    }

    fn render_movie(&self, frame: &mut Frame, area: Rect, movie: &MovieRecord) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        let info = Paragraph::new(info_lines(movie))
            .wrap(Wrap { trim: true })
            .block(panel(" INFO "));
        frame.render_widget(info, chunks[0]);

        let favorite = self.detail.is_favorite();
        let mut side = vec![
            Line::from(vec![
                Span::styled(
                    format!("{} ", heart(favorite)),
                    if favorite { Theme::favorite() } else { Theme::dimmed() },
                ),
                Span::styled(
                    if favorite { "In favorites" } else { "Not in favorites" },
                    Theme::text(),
                ),
            ]),
            Line::from(vec![
                Span::styled("  f  ", Theme::keybind()),
                Span::styled("toggle favorite", Theme::dimmed()),
            ]),
            Line::from(""),
            Line::from(Span::styled("POSTER", Theme::title())),
        ];
        side.push(match movie.poster_url(self.image_base).url() {
            Some(url) => Line::from(Span::styled(url.to_string(), Theme::secondary())),
            None => Line::from(Span::styled("[no poster]", Theme::dimmed())),
        });

        let side = Paragraph::new(side)
            .wrap(Wrap { trim: true })
            .block(panel(" FAVORITE "));
        frame.render_widget(side, chunks[1]);
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()))
}

/// Title, meta row, genres, tagline and overview
pub fn info_lines(movie: &MovieRecord) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut title = vec![Span::styled(movie.title.clone(), Theme::title())];
    if let Some(year) = movie.year() {
        title.push(Span::styled(format!(" ({})", year), Theme::year()));
    }
    lines.push(Line::from(title));

    let mut meta = vec![Span::styled(
        format!("★ {:.1} ({} votes)", movie.vote_average, movie.vote_count),
        Theme::rating(movie.vote_average),
    )];
    if let Some(runtime) = movie.runtime_str() {
        meta.push(Span::styled(" │ ", Theme::dimmed()));
        meta.push(Span::styled(runtime, Theme::secondary()));
    }
    if let Some(status) = &movie.status {
        meta.push(Span::styled(" │ ", Theme::dimmed()));
        meta.push(Span::styled(status.clone(), Theme::dimmed()));
    }
    lines.push(Line::from(meta));

    let genres = movie.genres_str();
    if !genres.is_empty() {
        lines.push(Line::from(Span::styled(genres, Theme::genre())));
    }
    if let Some(tagline) = &movie.tagline {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("\"{}\"", tagline),
            Theme::secondary(),
        )));
    }

    lines.push(Line::from(""));
    if movie.overview.is_empty() {
        lines.push(Line::from(Span::styled("No overview available.", Theme::dimmed())));
    } else {
        for paragraph in movie.overview.lines() {
            lines.push(Line::from(Span::styled(paragraph.to_string(), Theme::text())));
        }
    }
    lines
}

/// Centered status text inside a bordered block
pub fn render_message(frame: &mut Frame, area: Rect, msg: &str, style: Style, hint: Option<&str>) {
    let mut lines = vec![Line::from(""), Line::from(Span::styled(msg.to_string(), style))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint.to_string(), Theme::dimmed())));
    }
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel(" DETAIL "));
    frame.render_widget(paragraph, area);
}
