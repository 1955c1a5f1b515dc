mod detail;
mod listing;
mod state;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, widgets::ListState};
use tokio::time::interval;

pub use detail::DetailController;
pub use listing::{ListingController, ListingFocus};
pub use state::{App, Page};

const YEAR_STEP: i32 = 1;

pub async fn run(mut app: App) -> Result<()> {
    app.bootstrap();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut reader = EventStream::new();
    let mut ticker = interval(Duration::from_millis(200));

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.tick(Instant::now());
            },
            maybe_event = reader.next() => {
                if let Some(Ok(event)) = maybe_event {
                    handle_event(&mut app, event);
                }
            }
            Some(message) = app.msg_rx.recv() => {
                app.handle_message(message);
            }
        }

        if app.should_quit {
            break;
        }
    }

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}

fn handle_event(app: &mut App, event: Event) {
    if let Event::Key(key_event) = event {
        if key_event.kind == KeyEventKind::Press {
            handle_key_event(app, key_event);
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.page() {
        Page::Listing => handle_listing_keys(app, key),
        Page::Detail => handle_detail_keys(app, key),
    }
}

fn handle_listing_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.listing.focus = app.listing.focus.next(),
        KeyCode::BackTab => app.listing.focus = app.listing.focus.previous(),
        KeyCode::Char('q') if app.listing.focus != ListingFocus::Search => {
            app.should_quit = true;
        }
        _ => match app.listing.focus {
            ListingFocus::Search => handle_search_keys(app, key),
            ListingFocus::Suggestions => handle_suggestion_keys(app, key),
            ListingFocus::Filters => handle_filter_keys(app, key),
            ListingFocus::Results => handle_results_keys(app, key),
        },
    }
}

fn handle_search_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_query(),
        KeyCode::Esc => {
            app.listing.query.clear();
            app.on_query_changed();
        }
        KeyCode::Down if !app.listing.suggestions.is_empty() => {
            app.listing.focus = ListingFocus::Suggestions;
        }
        KeyCode::Backspace => {
            app.listing.query.pop();
            app.on_query_changed();
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::ALT)
                && !key.modifiers.contains(KeyModifiers::CONTROL)
            {
                app.listing.query.push(ch);
                app.on_query_changed();
            }
        }
        _ => {}
    }
}

fn handle_suggestion_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.listing.move_suggestion_selection(-1),
        KeyCode::Down => app.listing.move_suggestion_selection(1),
        KeyCode::Enter => app.pick_suggestion(),
        KeyCode::Esc => app.listing.focus = ListingFocus::Search,
        _ => {}
    }
}

fn handle_filter_keys(app: &mut App, key: KeyEvent) {
    let changed = match key.code {
        KeyCode::Up => {
            app.listing.filters.move_cursor(-1);
            false
        }
        KeyCode::Down => {
            app.listing.filters.move_cursor(1);
            false
        }
        KeyCode::Left => app.listing.filters.adjust(-YEAR_STEP),
        KeyCode::Right => app.listing.filters.adjust(YEAR_STEP),
        KeyCode::Char(' ') | KeyCode::Enter => app.listing.filters.toggle(),
        _ => false,
    };

    if changed {
        app.run_search();
    }
}

fn handle_results_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.listing.move_result_selection(-1),
        KeyCode::Down => app.listing.move_result_selection(1),
        KeyCode::Enter => app.open_selected_card(),
        _ => {}
    }
}

fn handle_detail_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Backspace => app.go_home(),
        KeyCode::Char('f') => app.toggle_favorite(),
        KeyCode::Char('s') => app.share(),
        KeyCode::Char('r') => app.load_details(),
        KeyCode::Char('x') => {
            if let Some(map) = app.detail.map.as_mut() {
                map.close_popup();
            }
        }
        KeyCode::Left | KeyCode::Right => {
            if let Some(map) = app.detail.map.as_mut() {
                map.move_selection(if key.code == KeyCode::Left { -1 } else { 1 });
            }
        }
        KeyCode::Enter => {
            if let Some(map) = app.detail.map.as_mut() {
                if let Some(index) = map.selected() {
                    map.open_popup(index);
                }
            }
        }
        _ => {}
    }
}

fn update_list_state(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }

    let current = state.selected().unwrap_or(0);
    let step = delta.unsigned_abs();
    let new_index = if delta < 0 {
        current.saturating_sub(step)
    } else {
        (current + step).min(len - 1)
    };
    state.select(Some(new_index));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_selection_is_clamped() {
        let mut state = ListState::default();
        update_list_state(&mut state, 3, 1);
        assert_eq!(state.selected(), Some(1));
        update_list_state(&mut state, 3, 10);
        assert_eq!(state.selected(), Some(2));
        update_list_state(&mut state, 3, -5);
        assert_eq!(state.selected(), Some(0));
        update_list_state(&mut state, 0, 1);
        assert_eq!(state.selected(), None);
    }
}
