use std::time::{Duration, Instant};

/// How long a banner stays on screen.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    shown_at: Instant,
}

impl Banner {
    pub fn error(message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
            shown_at: now,
        }
    }

    pub fn info(message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind: BannerKind::Info,
            message: message.into(),
            shown_at: now,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= BANNER_TTL
    }
}

/// Drops `slot`'s banner once it has been up for [`BANNER_TTL`].
pub fn expire(slot: &mut Option<Banner>, now: Instant) {
    if slot.as_ref().is_some_and(|banner| banner.is_expired(now)) {
        *slot = None;
    }
}
