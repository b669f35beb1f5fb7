//! Terminal UI
//!
//! Pure rendering of [`App`] state with ratatui. Nothing here mutates the
//! app; the event loop in `main.rs` owns input and fetches.

pub mod browser;
pub mod detail;
pub mod search;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, AppState, InputMode};
use crate::controllers::LoadingState;
use browser::BrowserView;
use detail::DetailView;
use search::SearchBar;

/// Height of the featured banner on the popular listing
const FEATURED_HEIGHT: u16 = 6;

/// Draw the whole screen
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    match app.state {
        AppState::Home => render_home(frame, chunks[1], app),
        AppState::Detail => DetailView {
            detail: &app.detail,
            image_base: &app.image_base_url,
        }
        .render(frame, chunks[1]),
        AppState::Favorites => render_favorites(frame, chunks[1], app),
    }
    render_status_bar(frame, chunks[2], app);

    if let Some(error) = &app.error {
        render_error_popup(frame, area, error);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(1)])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("MOVIE", Theme::title()),
        Span::styled("DECK", Theme::secondary().add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, chunks[0]);

    SearchBar {
        input: &app.search,
        editing: app.input_mode == InputMode::Editing,
        active: app.home.query.as_deref(),
    }
    .render(frame, chunks[1]);
}

/// Loading and error states replace the list; otherwise `render_list` runs
fn render_status_or(
    frame: &mut Frame,
    area: Rect,
    status: &LoadingState,
    title: &str,
    render_list: impl FnOnce(&mut Frame, Rect),
) {
    match status {
        LoadingState::Loading(msg) => {
            let text = format!("⟳ {}", msg.as_deref().unwrap_or("Loading..."));
            frame.render_widget(message_block(text, Theme::loading(), title, None), area);
        }
        LoadingState::Error(msg) => {
            frame.render_widget(
                message_block(msg.clone(), Theme::error(), title, Some("Press r to retry")),
                area,
            );
        }
        LoadingState::Idle => render_list(frame, area),
    }
}

fn message_block<'a>(
    text: String,
    style: Style,
    title: &'a str,
    hint: Option<&'a str>,
) -> Paragraph<'a> {
    let mut lines = vec![Line::from(""), Line::from(Span::styled(text, style))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint, Theme::dimmed())));
    }
    Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title(Span::styled(format!(" {} ", title), Theme::title())),
    )
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let home = &app.home;
    let title = if home.is_searching() { "RESULTS" } else { "POPULAR" };

    render_status_or(frame, area, &home.status, title, |frame, area| {
        let list_area = match &home.featured {
            Some(movie) if area.height > FEATURED_HEIGHT + 4 => {
                let split = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(FEATURED_HEIGHT), Constraint::Min(1)])
                    .split(area);
                browser::render_featured(frame, split[0], movie, &app.image_base_url);
                split[1]
            }
            _ => area,
        };

        BrowserView {
            cards: &home.cards,
            list: &app.home_list,
            title,
            empty_message: "No movies found",
            focused: app.input_mode == InputMode::Normal,
        }
        .render(frame, list_area);
    });
}

fn render_favorites(frame: &mut Frame, area: Rect, app: &App) {
    render_status_or(frame, area, &app.favorites.status, "FAVORITES", |frame, area| {
        BrowserView {
            cards: &app.favorites.cards,
            list: &app.favorites_list,
            title: "FAVORITES",
            empty_message: "No favorites yet. Press f on a movie to add it.",
            focused: true,
        }
        .render(frame, area);
    });
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " SEARCH ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::SECONDARY),
        ),
    };
    let screen = Span::styled(
        format!(" {} ", format!("{:?}", app.state).to_uppercase()),
        Theme::dimmed(),
    );
    let help = Span::styled(
        " /:search  ↵:open  f:favorite  F:favorites  r:retry  esc:back  q:quit ",
        Theme::dimmed(),
    );

    let status = Paragraph::new(Line::from(vec![mode, screen, Span::raw("│"), help]))
        .style(Theme::status_bar());
    frame.render_widget(status, area);
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = 5;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);
    let block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(Style::default().bg(Theme::BACKGROUND)),
    );
    frame.render_widget(block, popup);
}
