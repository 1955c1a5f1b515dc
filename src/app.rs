use crate::models::{Artist, ArtistDetails, Suggestion};
use crate::sequence::RequestToken;
use crate::share::ShareOutcome;

#[derive(Debug, Clone)]
pub enum AppMessage {
    SuggestionsLoaded {
        token: RequestToken,
        suggestions: Vec<Suggestion>,
    },
    SuggestionsFailed {
        token: RequestToken,
        reason: String,
    },
    SearchCompleted {
        token: RequestToken,
        artists: Vec<Artist>,
    },
    SearchFailed {
        token: RequestToken,
        reason: String,
    },
    DetailsLoaded {
        token: RequestToken,
        details: Box<ArtistDetails>,
    },
    DetailsFailed {
        token: RequestToken,
        reason: String,
    },
    ShareFinished(ShareOutcome),
}
