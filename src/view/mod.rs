//! Data-to-view builders. Nothing here touches the terminal; `tui::ui`
//! turns these structs into widgets.

pub mod banner;
pub mod detail;
pub mod listing;

pub use banner::{Banner, BannerKind};
pub use detail::{DetailView, SharePayload};
pub use listing::{LazyImageObserver, ResultCard, SuggestionRow};
