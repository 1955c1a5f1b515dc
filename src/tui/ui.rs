use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Line,
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Wrap,
        canvas::{Canvas, Map, MapResolution, Points},
    },
};

use crate::map::MapView;
use crate::view::{Banner, BannerKind, DetailView, ResultCard};

use super::{App, ListingFocus, Page};

const CARD_HEIGHT: u16 = 3;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    match app.page() {
        Page::Listing => {
            draw_search(frame, app, chunks[0]);
            draw_listing_body(frame, app, chunks[1]);
        }
        Page::Detail => {
            draw_detail_header(frame, app, chunks[0]);
            draw_detail_body(frame, app, chunks[1]);
        }
    }

    draw_banner(frame, app.banner.as_ref(), chunks[2]);
    draw_footer(frame, app, chunks[3]);
}

fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.listing.loading {
        "Search Artists (loading…)"
    } else {
        "Search Artists"
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app.listing.focus, ListingFocus::Search));

    let paragraph = Paragraph::new(format!("> {}", app.listing.query))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn draw_listing_body(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ])
        .split(columns[0]);

    draw_suggestions(frame, app, left[0]);
    draw_filters(frame, app, left[1]);
    draw_logs(frame, app, left[2]);
    draw_results(frame, app, columns[1]);
}

fn draw_suggestions(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .listing
        .suggestions
        .iter()
        .map(|row| ListItem::new(row.label.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Suggestions")
                .borders(Borders::ALL)
                .border_style(border_style(app.listing.focus, ListingFocus::Suggestions)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.listing.suggestion_state);
}

fn draw_filters(frame: &mut Frame, app: &App, area: Rect) {
    let filters = &app.listing.filters;
    let focused = app.listing.focus == ListingFocus::Filters;

    let items: Vec<ListItem> = (0..filters.row_count())
        .map(|idx| {
            let item = ListItem::new(filters.row_label(idx));
            if focused && idx == filters.cursor {
                item.style(
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Filters")
            .borders(Borders::ALL)
            .border_style(border_style(app.listing.focus, ListingFocus::Filters)),
    );

    frame.render_widget(list, area);
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = if app.listing.cards.is_empty() {
        vec![ListItem::new("No artists found").style(dim_style())]
    } else {
        app.listing
            .cards
            .iter()
            .map(|card| ListItem::new(card_lines(card)))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!("Results ({})", app.listing.cards.len()))
                .borders(Borders::ALL)
                .border_style(border_style(app.listing.focus, ListingFocus::Results)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.listing.results_state);

    let inner_height = area.height.saturating_sub(2);
    let visible_cards = inner_height.div_ceil(CARD_HEIGHT) as usize;
    let first = app.listing.results_state.offset();
    let last = (first + visible_cards).min(app.listing.cards.len());
    app.listing.reveal_visible(first..last);
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .logs
        .iter()
        .rev()
        .take(100)
        .map(|entry| Line::from(entry.clone()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Activity").borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_detail_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match (&app.detail.view, app.detail.loading, &app.detail.artist_id) {
        (_, true, Some(id)) => format!("Loading artist {id}…"),
        (_, true, None) => "Loading…".to_string(),
        (Some(view), false, _) => view.name.clone(),
        (None, false, Some(id)) => format!("Artist {id}"),
        (None, false, None) => "Artist".to_string(),
    };

    let paragraph = Paragraph::new(app.address.clone()).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(paragraph, area);
}

fn draw_detail_body(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let lines = match &app.detail.view {
        Some(view) => detail_lines(view),
        None => vec![Line::from("No artist loaded").style(dim_style())],
    };

    let info = Paragraph::new(lines)
        .block(Block::default().title("Details").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(info, columns[0]);

    match &app.detail.map {
        Some(map) if map.is_mounted() => draw_map(frame, map, columns[1]),
        _ => {
            let empty = Block::default().title("Map").borders(Borders::ALL);
            frame.render_widget(empty, columns[1]);
        }
    }
}

fn draw_map(frame: &mut Frame, map: &MapView, area: Rect) {
    let viewport = map.viewport();
    let coords: Vec<(f64, f64)> = map.markers().iter().map(|m| (m.lon, m.lat)).collect();
    let selected: Vec<(f64, f64)> = map
        .selected()
        .and_then(|idx| map.markers().get(idx))
        .map(|m| vec![(m.lon, m.lat)])
        .unwrap_or_default();
    let popup = map
        .popup()
        .map(|popup| (popup.anchor, format!("{} (x)", popup.address)));

    let title = match map.selected().and_then(|idx| map.markers().get(idx)) {
        Some(marker) => format!("Map • {} markers • {}", coords.len(), marker.address),
        None => format!("Map • {} markers", coords.len()),
    };

    let canvas = Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .marker(symbols::Marker::Braille)
        .x_bounds(viewport.x_bounds)
        .y_bounds(viewport.y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Red,
            });
            ctx.draw(&Points {
                coords: &selected,
                color: Color::Yellow,
            });
            if let Some(((x, y), label)) = &popup {
                ctx.print(
                    *x,
                    *y,
                    Line::styled(
                        label.clone(),
                        Style::default().fg(Color::Black).bg(Color::White),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn draw_banner(frame: &mut Frame, banner: Option<&Banner>, area: Rect) {
    let Some(banner) = banner else {
        return;
    };
    let style = match banner.kind {
        BannerKind::Error => Style::default().fg(Color::White).bg(Color::Red),
        BannerKind::Info => Style::default().fg(Color::Black).bg(Color::LightBlue),
    };
    frame.render_widget(Paragraph::new(banner.message.clone()).style(style), area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.page() {
        Page::Listing => {
            "Tab: cycle • type: search • Enter: confirm • ←/→: year • Space: toggle • q: quit"
        }
        Page::Detail if app.detail_controller.can_share() => {
            "f: favorite • s: share • ←/→: marker • Enter: popup • x: close • r: reload • Esc: back • q: quit"
        }
        Page::Detail => {
            "f: favorite • s: share (not configured) • ←/→: marker • Enter: popup • x: close • r: reload • Esc: back • q: quit"
        }
    };
    let footer = Paragraph::new(text).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, area);
}

fn card_lines(card: &ResultCard) -> Vec<Line<'static>> {
    vec![
        Line::from(card.title.clone()),
        Line::from(format!("   {} • {}", card.created, card.first_album)),
        Line::from(format!("   img: {}", card.image.src())).style(dim_style()),
    ]
}

fn detail_lines(view: &DetailView) -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(view.name.clone()).style(heading.fg(Color::Yellow)),
        Line::from(format!("img: {}", view.image)).style(dim_style()),
        Line::from(view.members.clone()),
        Line::from(view.creation_date.clone()),
        Line::from(view.first_album.clone()),
        Line::from(""),
        Line::from("Locations:").style(heading),
    ];
    lines.extend(view.locations.iter().map(|l| Line::from(format!("  • {l}"))));
    lines.push(Line::from("Dates:").style(heading));
    lines.extend(view.dates.iter().map(|d| Line::from(format!("  • {d}"))));
    lines.push(Line::from("Relations:").style(heading));
    lines.extend(view.relations.iter().map(|r| Line::from(format!("  • {r}"))));
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "[f] {}   [s] {}",
        view.favorite_button, view.share_button
    )));
    lines
}

fn border_style(current: ListingFocus, area: ListingFocus) -> Style {
    if current == area {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
