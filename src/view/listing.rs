use std::collections::BTreeSet;
use std::ops::Range;

use crate::models::{Artist, Suggestion};

pub const PLACEHOLDER_IMAGE: &str = "placeholder.jpg";

/// An image whose real source is only attached once it has been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyImage {
    pub alt: String,
    src: String,
    deferred_src: Option<String>,
}

impl LazyImage {
    pub fn deferred(real_src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            alt: alt.into(),
            src: PLACEHOLDER_IMAGE.to_string(),
            deferred_src: Some(real_src.into()),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_loaded(&self) -> bool {
        self.deferred_src.is_none()
    }

    fn reveal(&mut self) -> bool {
        match self.deferred_src.take() {
            Some(real) => {
                self.src = real;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub artist_id: u32,
    pub title: String,
    pub image: LazyImage,
    pub created: String,
    pub first_album: String,
    pub link: String,
}

pub fn result_card(artist: &Artist) -> ResultCard {
    let first_album = artist
        .first_album_year()
        .map(|year| year.to_string())
        .unwrap_or_else(|| artist.first_album.clone());

    ResultCard {
        artist_id: artist.id,
        title: artist.name.clone(),
        image: LazyImage::deferred(artist.image.clone(), artist.name.clone()),
        created: format!("Created: {}", artist.creation_date),
        first_album: format!("First Album: {first_album}"),
        link: artist.page_path(),
    }
}

pub fn result_cards(artists: &[Artist]) -> Vec<ResultCard> {
    artists.iter().map(result_card).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    pub label: String,
    /// What goes into the search box when the row is picked.
    pub fill: String,
}

pub fn suggestion_rows(suggestions: &[Suggestion]) -> Vec<SuggestionRow> {
    suggestions
        .iter()
        .map(|suggestion| SuggestionRow {
            label: suggestion.label(),
            fill: suggestion.text.clone(),
        })
        .collect()
}

/// Tracks which cards still wait for their image. Each card is revealed at
/// most once and is then dropped from the watch list.
#[derive(Debug, Clone, Default)]
pub struct LazyImageObserver {
    pending: BTreeSet<usize>,
}

impl LazyImageObserver {
    pub fn observe_all(&mut self, cards: &[ResultCard]) {
        self.pending = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.image.is_loaded())
            .map(|(idx, _)| idx)
            .collect();
    }

    #[cfg(test)]
    pub fn is_observing(&self, index: usize) -> bool {
        self.pending.contains(&index)
    }

    /// Reveals every pending card within `visible`. Returns how many swapped.
    pub fn on_visible(&mut self, visible: Range<usize>, cards: &mut [ResultCard]) -> usize {
        let hits: Vec<usize> = self.pending.range(visible).copied().collect();
        let mut revealed = 0;
        for idx in hits {
            self.pending.remove(&idx);
            if let Some(card) = cards.get_mut(idx) {
                if card.image.reveal() {
                    revealed += 1;
                }
            }
        }
        revealed
    }
}
