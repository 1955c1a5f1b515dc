use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token handed to a request when it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Monotonic counter for one request channel. A response is only worth
/// applying when its token is still the latest one issued.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

impl RequestSequence {
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Makes every outstanding token stale without issuing a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_current() {
        let sequence = RequestSequence::default();
        let first = sequence.issue();
        let second = sequence.issue();

        assert!(first < second);
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
    }

    #[test]
    fn clones_share_the_counter() {
        let sequence = RequestSequence::default();
        let handle = sequence.clone();
        let token = sequence.issue();
        assert!(handle.is_current(token));

        handle.invalidate();
        assert!(!sequence.is_current(token));
    }
}
