use crate::models::{Artist, ArtistDetails};

pub const ADD_FAVORITE_LABEL: &str = "☆ Add to Favorites";
pub const REMOVE_FAVORITE_LABEL: &str = "★ Remove from Favorites";
pub const SHARE_LABEL: &str = "Share";
pub const SHARE_UNSUPPORTED: &str =
    "Sharing is not supported here. You can copy the URL to share.";

pub fn favorite_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        REMOVE_FAVORITE_LABEL
    } else {
        ADD_FAVORITE_LABEL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub artist_id: u32,
    pub name: String,
    pub image: String,
    pub members: String,
    pub creation_date: String,
    pub first_album: String,
    pub locations: Vec<String>,
    pub dates: Vec<String>,
    pub relations: Vec<String>,
    pub favorite_button: String,
    pub share_button: String,
}

impl DetailView {
    /// Updates the favorite button in place after a toggle.
    pub fn set_favorite(&mut self, is_favorite: bool) {
        self.favorite_button = favorite_label(is_favorite).to_string();
    }
}

pub fn render_details(details: &ArtistDetails, is_favorite: bool) -> DetailView {
    let artist = &details.artist;

    DetailView {
        artist_id: artist.id,
        name: artist.name.clone(),
        image: artist.image.clone(),
        members: format!("Members: {}", artist.members_label()),
        creation_date: format!("Creation Date: {}", artist.creation_date),
        first_album: format!("First Album: {}", artist.first_album),
        locations: details
            .locations
            .iter()
            .map(|location| location.address.clone())
            .collect(),
        dates: details.dates.clone(),
        relations: details
            .relations
            .iter()
            .map(|(location, dates)| format!("{location}: {}", dates.join(", ")))
            .collect(),
        favorite_button: favorite_label(is_favorite).to_string(),
        share_button: SHARE_LABEL.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

pub fn share_payload(artist: &Artist, url: impl Into<String>) -> SharePayload {
    SharePayload {
        title: artist.name.clone(),
        text: format!("Check out {} on Groupie Tracker!", artist.name),
        url: url.into(),
    }
}
