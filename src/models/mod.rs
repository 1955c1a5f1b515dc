pub mod artist;
pub mod search;

pub use artist::{Artist, ArtistDetails, Location};
pub use search::{SearchFilters, SearchResponse, Suggestion};
