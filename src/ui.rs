//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Screen};
use crate::catalog::{format_rating, fuzzy_match_positions, list_line};
use crate::config::UiSettings;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Controls shown in the footer for `screen`.
fn controls_text(app: &App) -> String {
    if app.prompt.is_some() {
        return "[enter] confirm | [esc] cancel | [backspace] delete".to_string();
    }
    if app.filter_mode {
        return "[type] filter | [ctrl-j/k] move | [enter] keep | [esc] clear".to_string();
    }
    let common = "[1-4/tab] screens | [q] quit";
    let keys: &[&str] = match app.screen {
        Screen::Library => &["[j/k] move", "[/] filter", "[v] view id", "[r] reload", "[i] import"],
        Screen::Playlist => &[
            "[j/k] move",
            "[enter] play selected",
            "[a] play id",
            "[space] pause",
            "[s] stop",
        ],
        Screen::Update => &["[j/k] move", "[e] rate", "[n] rename"],
        Screen::Fetch => &["[j/k] move", "[/] search", "[enter] download"],
    };
    format!("{} | {common}", keys.join(" | "))
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Uppercase the characters of `text` at `positions`.
fn highlight(text: &str, positions: &[usize]) -> String {
    let mut rendered = String::with_capacity(text.len());
    let mut pos_iter = positions.iter().copied();
    let mut next_pos = pos_iter.next();

    for (ci, ch) in text.chars().enumerate() {
        if next_pos == Some(ci) {
            rendered.extend(ch.to_uppercase());
            next_pos = pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

/// Pick the visible window `[start, end)` that keeps `sel_pos` centered.
fn visible_window(total: usize, height: usize, sel_pos: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = sel_pos.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, ui_settings, chunks[0]);
    draw_status(frame, app, chunks[1]);

    match app.screen {
        Screen::Library | Screen::Update => {
            let cols = split_with_details(app, chunks[2]);
            draw_catalog_list(frame, app, cols[0]);
            if let Some(area) = cols.get(1) {
                draw_details(frame, app, *area);
            }
        }
        Screen::Playlist => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[2]);
            draw_catalog_list(frame, app, cols[0]);
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(6), Constraint::Min(1)])
                .split(cols[1]);
            draw_details(frame, app, right[0]);
            draw_session(frame, app, right[1]);
        }
        Screen::Fetch => draw_search_hits(frame, app, chunks[2]),
    }

    if let Some(prompt) = &app.prompt {
        let area = centered_rect_sized(60, 3, chunks[2]);
        frame.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}_", prompt.input)).block(
            Block::bordered()
                .padding(LEFT_PAD)
                .title(format!(" {} ", prompt.kind.label())),
        );
        frame.render_widget(input, area);
    }

    let footer = Paragraph::new(controls_text(app))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, ui_settings: &UiSettings, area: Rect) {
    let tabs = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if *s == app.screen {
                format!("[{} {}]", i + 1, s.title().to_uppercase())
            } else {
                format!(" {} {} ", i + 1, s.title())
            }
        })
        .collect::<Vec<String>>()
        .join("  ");
    let header = Paragraph::new(tabs).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(ui_settings.header_text.as_str())
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut parts: Vec<String> = Vec::new();

    if let Some(ref h) = app.playback_handle {
        if let Ok(info) = h.lock() {
            match (&info.path, &info.error) {
                (_, Some(err)) => parts.push(format!("AUDIO: {err}")),
                (Some(path), None) => {
                    let state = if info.playing { "Playing" } else { "Paused" };
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    parts.push(format!("{state}: {name} [{}]", format_mmss(info.elapsed)));
                }
                (None, None) => parts.push("Stopped".to_string()),
            }
        }
    }

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        parts.push(format!("FILTER: {q}"));
    }
    if app.fetch_busy {
        parts.push("Working...".to_string());
    }
    parts.push(format!("Tracks: {}", app.catalog.len()));

    let message_style = if app.status.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let text = format!("{}\n{}", app.status.text, parts.join(" • "));
    let status = Paragraph::new(text)
        .style(message_style)
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

/// Give the details pane a column only when there is something to show.
fn split_with_details(app: &App, area: Rect) -> std::rc::Rc<[Rect]> {
    let constraints = if app.details.is_some() {
        vec![Constraint::Percentage(60), Constraint::Percentage(40)]
    } else {
        vec![Constraint::Percentage(100)]
    };
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
}

fn draw_catalog_list(frame: &mut Frame, app: &App, area: Rect) {
    let display = app.display_indices();
    let records = app.catalog.list_all();
    let q = app.filter_query.trim();

    let total = display.len();
    // Borders take two rows.
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = visible_window(total, list_height, sel_pos);

    // Only build ListItems for the visible window.
    let items: Vec<ListItem> = display[start..end]
        .iter()
        .filter_map(|&i| records.get(i))
        .map(|r| {
            let line = if q.is_empty() {
                list_line(r, app.rating_stars)
            } else {
                let shown = r.display();
                let positions = fuzzy_match_positions(&shown, q).unwrap_or_default();
                format!(
                    "{}, Rating: {}",
                    highlight(&shown, &positions),
                    format_rating(r.rating, app.rating_stars)
                )
            };
            ListItem::new(format!("{}  {line}", r.track_id))
        })
        .collect();

    let title = if records.is_empty() {
        " tracks (no tracks available) ".to_string()
    } else {
        format!(" tracks {}/{} ", total, records.len())
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.details.clone().unwrap_or_default();
    let details = Paragraph::new(text)
        .block(Block::bordered().padding(LEFT_PAD).title(" track "))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, area);
}

fn draw_session(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .session
        .iter()
        .map(|(name, count)| {
            if *count > 1 {
                ListItem::new(format!("{name} (x{count})"))
            } else {
                ListItem::new(name.as_str())
            }
        })
        .collect();
    let list = List::new(items).block(Block::bordered().title(" track list "));
    frame.render_widget(list, area);
}

fn draw_search_hits(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.search_hits.len();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_window(total, height, app.hit_selected);

    let items: Vec<ListItem> = app.search_hits[start..end]
        .iter()
        .map(|hit| ListItem::new(format!("{} ({})", hit.title, hit.channel)))
        .collect();

    let list = List::new(items)
        .block(Block::bordered().title(" search results "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.hit_selected - start));
    }

    if app.fetch_busy && total == 0 {
        let waiting = Paragraph::new("Working...")
            .slow_blink()
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" search results "));
        frame.render_widget(waiting, area);
    } else {
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_uppercases_matched_positions() {
        assert_eq!(highlight("hello world", &[0, 6]), "Hello World");
        assert_eq!(highlight("abc", &[]), "abc");
    }

    #[test]
    fn visible_window_centers_selection() {
        assert_eq!(visible_window(5, 10, 3), (0, 5));
        assert_eq!(visible_window(100, 10, 50), (45, 55));
        assert_eq!(visible_window(100, 10, 98), (90, 100));
        assert_eq!(visible_window(100, 10, 2), (0, 10));
    }

    #[test]
    fn mmss_formatting() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(125)), "02:05");
    }

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 40, 10);
        let r = centered_rect_sized(60, 3, outer);
        assert!(r.width <= 38);
        assert_eq!(r.height, 3);
        assert!(r.x + r.width <= outer.width);
    }
}
