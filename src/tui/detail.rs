use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task;

use crate::api::groupie::GroupieClient;
use crate::app::AppMessage;
use crate::favorites::{FavoritesError, FavoritesService};
use crate::map::{MapView, render_map};
use crate::models::ArtistDetails;
use crate::sequence::{RequestSequence, RequestToken};
use crate::share::{ShareOutcome, ShareTarget};
use crate::view::SharePayload;
use crate::view::detail::{DetailView, render_details};

pub const DETAILS_FAILED: &str =
    "An error occurred while fetching artist details. Please try again later.";

/// Last path segment of `address`, e.g. `"7"` for `/artist/7`. A trailing
/// slash yields nothing.
pub fn get_artist_id(address: &str) -> Option<String> {
    let path = address.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct DetailController {
    client: GroupieClient,
    share_target: Option<Arc<dyn ShareTarget>>,
    message_tx: UnboundedSender<AppMessage>,
    requests: RequestSequence,
}

impl DetailController {
    pub fn new(
        client: GroupieClient,
        share_target: Option<Arc<dyn ShareTarget>>,
        message_tx: UnboundedSender<AppMessage>,
    ) -> Self {
        Self {
            client,
            share_target,
            message_tx,
            requests: RequestSequence::default(),
        }
    }

    pub fn load_details(&self, artist_id: &str) -> RequestToken {
        let token = self.requests.issue();
        let client = self.client.clone();
        let tx = self.message_tx.clone();
        let artist_id = artist_id.to_string();

        task::spawn(async move {
            match client.artist_details(&artist_id).await {
                Ok(details) => {
                    let _ = tx.send(AppMessage::DetailsLoaded {
                        token,
                        details: Box::new(details),
                    });
                }
                Err(err) => {
                    tracing::error!(%artist_id, error = %err, "artist details request failed");
                    let _ = tx.send(AppMessage::DetailsFailed {
                        token,
                        reason: format!("Details for artist {artist_id} failed: {err}"),
                    });
                }
            }
        });

        token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.requests.is_current(token)
    }

    /// Drops whatever detail response is still in flight.
    pub fn abandon(&self) {
        self.requests.invalidate();
    }

    pub fn can_share(&self) -> bool {
        self.share_target.is_some()
    }

    /// Hands `payload` to the share target in the background. Returns
    /// [`ShareOutcome::Unsupported`] right away when there is none.
    pub fn share(&self, payload: SharePayload) -> Option<ShareOutcome> {
        let Some(target) = self.share_target.clone() else {
            return Some(ShareOutcome::Unsupported);
        };
        let tx = self.message_tx.clone();

        task::spawn(async move {
            let outcome = task::spawn_blocking(move || target.share(&payload)).await;

            let outcome = match outcome {
                Ok(Ok(())) => ShareOutcome::Shared,
                Ok(Err(err)) => ShareOutcome::Failed(err.to_string()),
                Err(join_err) => ShareOutcome::Failed(format!("share task panicked: {join_err}")),
            };
            let _ = tx.send(AppMessage::ShareFinished(outcome));
        });

        None
    }
}

#[derive(Default)]
pub struct DetailState {
    pub artist_id: Option<String>,
    pub details: Option<ArtistDetails>,
    pub view: Option<DetailView>,
    pub map: Option<MapView>,
    pub loading: bool,
}

impl DetailState {
    pub fn reset(&mut self, artist_id: Option<String>) {
        if let Some(map) = self.map.as_mut() {
            map.unmount();
        }
        *self = Self {
            artist_id,
            ..Self::default()
        };
    }

    pub fn render(&mut self, details: ArtistDetails, is_favorite: bool) {
        self.view = Some(render_details(&details, is_favorite));
        self.map = Some(render_map(self.map.take(), &details.locations));
        self.details = Some(details);
    }

    /// Toggles the shown artist and relabels the button. Returns the new
    /// membership, or `None` when nothing is shown.
    pub fn toggle_favorite(
        &mut self,
        favorites: &mut FavoritesService,
    ) -> Result<Option<bool>, FavoritesError> {
        let Some(view) = self.view.as_mut() else {
            return Ok(None);
        };
        let now_favorite = favorites.toggle(view.artist_id)?;
        view.set_favorite(now_favorite);
        Ok(Some(now_favorite))
    }
}
