use std::ops::Range;

use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task;

use crate::api::groupie::GroupieClient;
use crate::app::AppMessage;
use crate::models::search::{FILTER_YEAR_FLOOR, FILTER_YEAR_MAX};
use crate::models::{Artist, SearchFilters, Suggestion};
use crate::sequence::{RequestSequence, RequestToken};
use crate::view::listing::{result_cards, suggestion_rows};
use crate::view::{LazyImageObserver, ResultCard, SuggestionRow};

use super::update_list_state;

pub const MEMBER_COUNT_MAX: u32 = 8;
pub const SEARCH_FAILED: &str =
    "An error occurred while searching for artists. Please try again later.";

/// Issues search and suggestion requests for the listing page.
#[derive(Clone)]
pub struct ListingController {
    client: GroupieClient,
    message_tx: UnboundedSender<AppMessage>,
    searches: RequestSequence,
    suggestions: RequestSequence,
}

impl ListingController {
    pub fn new(client: GroupieClient, message_tx: UnboundedSender<AppMessage>) -> Self {
        Self {
            client,
            message_tx,
            searches: RequestSequence::default(),
            suggestions: RequestSequence::default(),
        }
    }

    /// Requests suggestions for a non-empty `query`. An empty query issues
    /// nothing and makes any in-flight suggestion response stale.
    pub fn fetch_suggestions(&self, query: &str) -> Option<RequestToken> {
        if query.is_empty() {
            self.suggestions.invalidate();
            return None;
        }

        let token = self.suggestions.issue();
        let client = self.client.clone();
        let tx = self.message_tx.clone();
        let query = query.to_string();

        task::spawn(async move {
            match client.suggestions(&query).await {
                Ok(suggestions) => {
                    let _ = tx.send(AppMessage::SuggestionsLoaded { token, suggestions });
                }
                Err(err) => {
                    tracing::error!(%query, error = %err, "suggestion request failed");
                    let _ = tx.send(AppMessage::SuggestionsFailed {
                        token,
                        reason: format!("Suggestions failed: {err}"),
                    });
                }
            }
        });

        Some(token)
    }

    /// Makes any in-flight suggestion response stale.
    pub fn cancel_suggestions(&self) {
        self.suggestions.invalidate();
    }

    pub fn search(&self, query: String, filters: SearchFilters) -> RequestToken {
        let token = self.searches.issue();
        let client = self.client.clone();
        let tx = self.message_tx.clone();

        task::spawn(async move {
            match client.search(&query, &filters).await {
                Ok(artists) => {
                    let _ = tx.send(AppMessage::SearchCompleted { token, artists });
                }
                Err(err) => {
                    tracing::error!(%query, error = %err, "artist search failed");
                    let _ = tx.send(AppMessage::SearchFailed {
                        token,
                        reason: format!("Artist search failed: {err}"),
                    });
                }
            }
        });

        token
    }

    pub fn is_current_search(&self, token: RequestToken) -> bool {
        self.searches.is_current(token)
    }

    pub fn is_current_suggestion(&self, token: RequestToken) -> bool {
        self.suggestions.is_current(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFocus {
    Search,
    Suggestions,
    Filters,
    Results,
}

impl ListingFocus {
    pub fn next(self) -> Self {
        match self {
            ListingFocus::Search => ListingFocus::Suggestions,
            ListingFocus::Suggestions => ListingFocus::Filters,
            ListingFocus::Filters => ListingFocus::Results,
            ListingFocus::Results => ListingFocus::Search,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            ListingFocus::Search => ListingFocus::Results,
            ListingFocus::Suggestions => ListingFocus::Search,
            ListingFocus::Filters => ListingFocus::Suggestions,
            ListingFocus::Results => ListingFocus::Filters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRow {
    CreationYear,
    FirstAlbumYear,
    Members(u32),
    Location(usize),
}

/// Slider and checkbox state behind the filter panel.
#[derive(Debug, Clone)]
pub struct FilterControls {
    pub creation_year: i32,
    pub first_album_year: i32,
    members: Vec<bool>,
    locations: Vec<(String, bool)>,
    pub cursor: usize,
}

impl FilterControls {
    pub fn new(location_options: &[String]) -> Self {
        let mut controls = Self {
            creation_year: FILTER_YEAR_FLOOR,
            first_album_year: FILTER_YEAR_FLOOR,
            members: vec![false; MEMBER_COUNT_MAX as usize],
            locations: Vec::new(),
            cursor: 0,
        };
        for option in location_options {
            controls.add_location_option(option);
        }
        controls
    }

    pub fn row_count(&self) -> usize {
        2 + self.members.len() + self.locations.len()
    }

    pub fn row(&self, index: usize) -> Option<FilterRow> {
        let members = self.members.len();
        match index {
            0 => Some(FilterRow::CreationYear),
            1 => Some(FilterRow::FirstAlbumYear),
            i if i < 2 + members => Some(FilterRow::Members((i - 1) as u32)),
            i if i < self.row_count() => Some(FilterRow::Location(i - 2 - members)),
            _ => None,
        }
    }

    pub fn row_label(&self, index: usize) -> String {
        match self.row(index) {
            Some(FilterRow::CreationYear) => format!("Creation year ≥ ◀ {} ▶", self.creation_year),
            Some(FilterRow::FirstAlbumYear) => {
                format!("First album ≥ ◀ {} ▶", self.first_album_year)
            }
            Some(FilterRow::Members(count)) => {
                let mark = checkbox(self.members[(count - 1) as usize]);
                format!("{mark} {count} member{}", if count == 1 { "" } else { "s" })
            }
            Some(FilterRow::Location(idx)) => {
                let (name, checked) = &self.locations[idx];
                format!("{} {name}", checkbox(*checked))
            }
            None => String::new(),
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.row_count();
        let step = delta.unsigned_abs();
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(step)
        } else {
            (self.cursor + step).min(len.saturating_sub(1))
        };
    }

    /// Moves the slider under the cursor. Returns whether a value changed.
    pub fn adjust(&mut self, delta: i32) -> bool {
        match self.row(self.cursor) {
            Some(FilterRow::CreationYear) => {
                let next = clamp_year(self.creation_year + delta);
                let changed = next != self.creation_year;
                self.creation_year = next;
                changed
            }
            Some(FilterRow::FirstAlbumYear) => {
                let next = clamp_year(self.first_album_year + delta);
                let changed = next != self.first_album_year;
                self.first_album_year = next;
                changed
            }
            _ => false,
        }
    }

    /// Flips the checkbox under the cursor. Returns whether anything changed.
    pub fn toggle(&mut self) -> bool {
        match self.row(self.cursor) {
            Some(FilterRow::Members(count)) => {
                let slot = &mut self.members[(count - 1) as usize];
                *slot = !*slot;
                true
            }
            Some(FilterRow::Location(idx)) => {
                let slot = &mut self.locations[idx].1;
                *slot = !*slot;
                true
            }
            _ => false,
        }
    }

    pub fn add_location_option(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || self.locations.iter().any(|(option, _)| option == name) {
            return;
        }
        self.locations.push((name.to_string(), false));
    }

    /// Reads the controls into a request body. The maximums are fixed.
    pub fn get_filter_values(&self) -> SearchFilters {
        SearchFilters {
            creation_year_min: self.creation_year,
            creation_year_max: FILTER_YEAR_MAX,
            first_album_year_min: self.first_album_year,
            first_album_year_max: FILTER_YEAR_MAX,
            members: self
                .members
                .iter()
                .enumerate()
                .filter(|(_, checked)| **checked)
                .map(|(idx, _)| idx as u32 + 1)
                .collect(),
            locations: self
                .locations
                .iter()
                .filter(|(_, checked)| *checked)
                .map(|(name, _)| name.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
impl FilterControls {
    pub fn set_member(&mut self, count: u32, checked: bool) {
        if let Some(slot) = count
            .checked_sub(1)
            .and_then(|idx| self.members.get_mut(idx as usize))
        {
            *slot = checked;
        }
    }

    pub fn set_location(&mut self, name: &str, checked: bool) {
        if let Some((_, slot)) = self.locations.iter_mut().find(|(option, _)| option == name) {
            *slot = checked;
        }
    }

    pub fn location_options(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|(name, _)| name.as_str())
    }
}

fn clamp_year(year: i32) -> i32 {
    year.clamp(FILTER_YEAR_FLOOR, FILTER_YEAR_MAX)
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub struct ListingState {
    pub query: String,
    pub suggestions: Vec<SuggestionRow>,
    pub suggestion_state: ListState,
    pub filters: FilterControls,
    pub cards: Vec<ResultCard>,
    pub results_state: ListState,
    pub images: LazyImageObserver,
    pub loading: bool,
    pub focus: ListingFocus,
}

impl ListingState {
    pub fn new(location_options: &[String]) -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            suggestion_state: ListState::default(),
            filters: FilterControls::new(location_options),
            cards: Vec::new(),
            results_state: ListState::default(),
            images: LazyImageObserver::default(),
            loading: false,
            focus: ListingFocus::Search,
        }
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestion_state.select(None);
    }

    pub fn show_suggestions(&mut self, suggestions: &[Suggestion]) {
        for suggestion in suggestions.iter().filter(|s| s.is_location()) {
            self.filters.add_location_option(&suggestion.text);
        }
        self.suggestions = suggestion_rows(suggestions);
        self.suggestion_state
            .select(if self.suggestions.is_empty() { None } else { Some(0) });
    }

    /// Fills the search box from the highlighted suggestion and clears the
    /// list. Returns the new query.
    pub fn pick_suggestion(&mut self) -> Option<String> {
        let row = self
            .suggestion_state
            .selected()
            .and_then(|idx| self.suggestions.get(idx))?;
        self.query = row.fill.clone();
        self.clear_suggestions();
        self.focus = ListingFocus::Search;
        Some(self.query.clone())
    }

    pub fn show_results(&mut self, artists: &[Artist]) {
        self.cards = result_cards(artists);
        self.images.observe_all(&self.cards);
        self.results_state
            .select(if self.cards.is_empty() { None } else { Some(0) });
        *self.results_state.offset_mut() = 0;
    }

    pub fn selected_card(&self) -> Option<&ResultCard> {
        self.results_state
            .selected()
            .and_then(|idx| self.cards.get(idx))
    }

    pub fn move_suggestion_selection(&mut self, delta: isize) {
        update_list_state(&mut self.suggestion_state, self.suggestions.len(), delta);
    }

    pub fn move_result_selection(&mut self, delta: isize) {
        update_list_state(&mut self.results_state, self.cards.len(), delta);
    }

    pub fn reveal_visible(&mut self, visible: Range<usize>) -> usize {
        self.images.on_visible(visible, &mut self.cards)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use crate::test_support::{Backend, next_message};

    use super::*;

    #[test]
    fn filter_payload_from_controls() {
        let mut controls = FilterControls::new(&["Paris".to_string(), "London".to_string()]);
        controls.creation_year = 1980;
        controls.first_album_year = 1990;
        controls.set_member(4, true);
        controls.set_member(2, true);
        controls.set_location("London", true);

        assert_eq!(
            controls.get_filter_values(),
            SearchFilters {
                creation_year_min: 1980,
                creation_year_max: 2023,
                first_album_year_min: 1990,
                first_album_year_max: 2023,
                members: vec![2, 4],
                locations: vec!["London".to_string()],
            }
        );
    }

    #[test]
    fn cursor_walks_sliders_members_and_locations() {
        let mut controls = FilterControls::new(&["london-uk".to_string()]);
        assert_eq!(controls.row_count(), 2 + 8 + 1);
        assert_eq!(controls.row(0), Some(FilterRow::CreationYear));
        assert_eq!(controls.row(2), Some(FilterRow::Members(1)));
        assert_eq!(controls.row(9), Some(FilterRow::Members(8)));
        assert_eq!(controls.row(10), Some(FilterRow::Location(0)));
        assert_eq!(controls.row(11), None);

        assert!(controls.adjust(5));
        assert_eq!(controls.creation_year, FILTER_YEAR_FLOOR + 5);
        assert!(controls.adjust(-100));
        assert_eq!(controls.creation_year, FILTER_YEAR_FLOOR);
        assert!(!controls.adjust(-1));
        assert!(!controls.toggle());

        controls.move_cursor(3);
        assert!(controls.toggle());
        assert_eq!(controls.get_filter_values().members, vec![2]);
        assert_eq!(controls.row_label(3), "[x] 2 members");

        controls.move_cursor(50);
        assert_eq!(controls.cursor, 10);
        assert!(controls.toggle());
        assert_eq!(controls.get_filter_values().locations, vec!["london-uk"]);
    }

    #[test]
    fn location_suggestions_extend_options_once() {
        let mut state = ListingState::new(&["london-uk".to_string()]);
        let suggestions = vec![
            Suggestion {
                text: "london-uk".into(),
                kind: "location".into(),
            },
            Suggestion {
                text: "lagos-nigeria".into(),
                kind: "location".into(),
            },
            Suggestion {
                text: "Led Zeppelin".into(),
                kind: "artist/band".into(),
            },
        ];
        state.show_suggestions(&suggestions);

        let options: Vec<_> = state.filters.location_options().collect();
        assert_eq!(options, ["london-uk", "lagos-nigeria"]);
        assert_eq!(state.suggestions.len(), 3);
    }

    #[test]
    fn picking_a_suggestion_fills_query_and_clears_list() {
        let mut state = ListingState::new(&[]);
        state.show_suggestions(&[Suggestion {
            text: "Queen".into(),
            kind: "artist/band".into(),
        }]);

        assert_eq!(state.pick_suggestion().as_deref(), Some("Queen"));
        assert_eq!(state.query, "Queen");
        assert!(state.suggestions.is_empty());
        assert!(state.pick_suggestion().is_none());
    }

    #[tokio::test]
    async fn empty_query_issues_no_suggestion_request() {
        let backend = Backend::spawn().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = GroupieClient::new(&backend.config).unwrap();
        let controller = ListingController::new(client, tx);

        assert!(controller.fetch_suggestions("").is_none());

        let token = controller.fetch_suggestions("q").unwrap();
        match next_message(&mut rx).await {
            AppMessage::SuggestionsLoaded {
                token: got,
                suggestions,
            } => {
                assert_eq!(got, token);
                assert_eq!(suggestions[0].text, "q band");
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(backend.suggestion_hits(), 1);
    }

    #[tokio::test]
    async fn clearing_the_query_makes_pending_suggestions_stale() {
        let backend = Backend::spawn().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = GroupieClient::new(&backend.config).unwrap();
        let controller = ListingController::new(client, tx);

        let token = controller.fetch_suggestions("qu").unwrap();
        assert!(controller.is_current_suggestion(token));
        controller.fetch_suggestions("");
        assert!(!controller.is_current_suggestion(token));
    }

    #[tokio::test]
    async fn search_reports_failure_with_its_token() {
        let backend = Backend::spawn().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = GroupieClient::new(&backend.config).unwrap();
        let controller = ListingController::new(client, tx);

        let token = controller.search("fail".into(), SearchFilters::default());
        match next_message(&mut rx).await {
            AppMessage::SearchFailed { token: got, reason } => {
                assert_eq!(got, token);
                assert!(reason.contains("500"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
