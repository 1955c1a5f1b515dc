use std::collections::VecDeque;
use std::time::Instant;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::AppMessage;
use crate::config::AppConfig;
use crate::favorites::FavoritesService;
use crate::models::artist::artist_path;
use crate::share::ShareOutcome;
use crate::view::banner::{self, Banner};
use crate::view::detail::{SHARE_UNSUPPORTED, share_payload};

use super::detail::{DETAILS_FAILED, DetailController, DetailState, get_artist_id};
use super::listing::{ListingController, ListingState, SEARCH_FAILED};

const LOG_CAPACITY: usize = 200;
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Listing,
    Detail,
}

pub struct App {
    pub listing_controller: ListingController,
    pub detail_controller: DetailController,
    pub msg_rx: UnboundedReceiver<AppMessage>,
    pub config: AppConfig,
    pub favorites: FavoritesService,
    pub address: String,
    pub listing: ListingState,
    pub detail: DetailState,
    pub banner: Option<Banner>,
    pub logs: VecDeque<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        listing_controller: ListingController,
        detail_controller: DetailController,
        msg_rx: UnboundedReceiver<AppMessage>,
        config: AppConfig,
        favorites: FavoritesService,
        start_address: String,
    ) -> Self {
        let listing = ListingState::new(config.location_options());

        Self {
            listing_controller,
            detail_controller,
            msg_rx,
            config,
            favorites,
            address: start_address,
            listing,
            detail: DetailState::default(),
            banner: None,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            should_quit: false,
        }
    }

    /// Runs the page-load request for the starting address.
    pub fn bootstrap(&mut self) {
        match self.page() {
            Page::Listing => self.run_search(),
            Page::Detail => self.load_details(),
        }
    }

    pub fn page(&self) -> Page {
        if self.address.starts_with("/artist/") {
            Page::Detail
        } else {
            Page::Listing
        }
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        self.address = path.into();
        tracing::info!(address = %self.address, "navigating");
        match self.page() {
            Page::Detail => self.load_details(),
            Page::Listing => {
                self.detail_controller.abandon();
                self.detail.reset(None);
            }
        }
    }

    pub fn go_home(&mut self) {
        self.navigate(HOME_PATH);
    }

    pub fn open_selected_card(&mut self) {
        if let Some(card) = self.listing.selected_card() {
            let link = card.link.clone();
            self.navigate(link);
        }
    }

    pub fn run_search(&mut self) {
        let filters = self.listing.filters.get_filter_values();
        self.listing_controller
            .search(self.listing.query.clone(), filters);
        self.listing.loading = true;
    }

    pub fn on_query_changed(&mut self) {
        if self
            .listing_controller
            .fetch_suggestions(&self.listing.query)
            .is_none()
        {
            self.listing.clear_suggestions();
        }
    }

    /// Commits the typed query: suggestions are closed for good and a
    /// full search runs.
    pub fn submit_query(&mut self) {
        self.listing_controller.cancel_suggestions();
        self.listing.clear_suggestions();
        self.run_search();
    }

    pub fn pick_suggestion(&mut self) {
        if self.listing.pick_suggestion().is_some() {
            self.listing_controller.cancel_suggestions();
            self.run_search();
        }
    }

    pub fn load_details(&mut self) {
        let artist_id = get_artist_id(&self.address);
        self.detail.reset(artist_id.clone());

        match artist_id {
            Some(id) => {
                self.detail.loading = true;
                self.detail_controller.load_details(&id);
            }
            None => self.push_log("No artist id in address"),
        }
    }

    pub fn toggle_favorite(&mut self) {
        match self.detail.toggle_favorite(&mut self.favorites) {
            Ok(Some(true)) => self.push_log("Added to favorites"),
            Ok(Some(false)) => self.push_log("Removed from favorites"),
            Ok(None) => {}
            Err(err) => {
                tracing::error!(error = %err, "failed to persist favorites");
                self.show_error(format!("Could not save favorites: {err}"));
            }
        }
    }

    pub fn share(&mut self) {
        let Some(details) = self.detail.details.as_ref() else {
            return;
        };
        let url = self.config.page_url(&artist_path(details.artist.id));
        let payload = share_payload(&details.artist, url);

        if let Some(outcome) = self.detail_controller.share(payload) {
            self.on_share_finished(outcome);
        }
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::SuggestionsLoaded { token, suggestions } => {
                if !self.listing_controller.is_current_suggestion(token) {
                    tracing::debug!(?token, "dropping stale suggestions");
                    return;
                }
                self.listing.show_suggestions(&suggestions);
            }
            AppMessage::SuggestionsFailed { token, reason } => {
                if self.listing_controller.is_current_suggestion(token) {
                    self.push_log(reason);
                }
            }
            AppMessage::SearchCompleted { token, artists } => {
                if !self.listing_controller.is_current_search(token) {
                    tracing::debug!(?token, "dropping stale search results");
                    return;
                }
                self.listing.loading = false;
                self.listing.show_results(&artists);
                self.push_log(format!("Search returned {} artists", artists.len()));
            }
            AppMessage::SearchFailed { token, reason } => {
                if !self.listing_controller.is_current_search(token) {
                    return;
                }
                self.listing.loading = false;
                self.push_log(reason);
                self.show_error(SEARCH_FAILED);
            }
            AppMessage::DetailsLoaded { token, details } => {
                if !self.detail_controller.is_current(token) {
                    tracing::debug!(?token, "dropping stale artist details");
                    return;
                }
                let is_favorite = self.favorites.is_favorite(details.artist.id);
                self.push_log(format!("Loaded {}", details.artist.name));
                self.detail.render(*details, is_favorite);
                self.detail.loading = false;
            }
            AppMessage::DetailsFailed { token, reason } => {
                if !self.detail_controller.is_current(token) {
                    return;
                }
                self.detail.loading = false;
                self.push_log(reason);
                self.show_error(DETAILS_FAILED);
            }
            AppMessage::ShareFinished(outcome) => self.on_share_finished(outcome),
        }
    }

    fn on_share_finished(&mut self, outcome: ShareOutcome) {
        match outcome {
            ShareOutcome::Shared => self.push_log("Successful share"),
            ShareOutcome::Unsupported => {
                self.banner = Some(Banner::info(SHARE_UNSUPPORTED, Instant::now()));
            }
            ShareOutcome::Failed(reason) => {
                tracing::warn!(%reason, "share failed");
                self.push_log(format!("Error sharing: {reason}"));
            }
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::error(message, Instant::now()));
    }

    pub fn tick(&mut self, now: Instant) {
        banner::expire(&mut self.banner, now);
    }

    pub fn push_log<S: Into<String>>(&mut self, message: S) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(message.into());
    }
}
