//
// debounce.rs
//
// Per-document debounce state for scan scheduling
//

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tokio_util::sync::CancellationToken;
use url::Url;

/// A scheduled scan's claim on its URI slot.
///
/// The token signals supersession; the generation identifies which
/// scheduling call owns the slot, since tokens themselves have no identity.
#[derive(Debug, Clone)]
pub struct ScanTicket {
    pub token: CancellationToken,
    pub generation: u64,
}

/// Tracks the pending scan per document URI.
///
/// Text-change events can fire per keystroke; each event schedules a scan
/// and cancels the one already pending for that URI, so a burst of edits
/// coalesces into a single cycle once the quiescence window elapses.
/// Completion is claimed, not assumed: a task whose quiescence window has
/// elapsed may already have been superseded by a newer event, and only the
/// ticket still registered for the URI may run and retire the slot.
#[derive(Debug, Default)]
pub struct ScanDebouncer {
    /// Pending scan generations and tokens keyed by URI
    pending: RwLock<HashMap<Url, (u64, CancellationToken)>>,
    /// Monotonic generation source shared by all URIs
    generations: AtomicU64,
}

impl ScanDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a scan for a document, cancelling any pending one.
    /// Returns the new task's ticket.
    pub fn schedule(&self, uri: Url) -> ScanTicket {
        let mut pending = self.pending.write().unwrap();
        if let Some((_, old_token)) = pending.remove(&uri) {
            old_token.cancel();
        }
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        pending.insert(uri, (generation, token.clone()));
        ScanTicket { token, generation }
    }

    /// Claim completion of the pending scan for a URI. Returns true and
    /// retires the slot only if `generation` still owns it; a stale claim
    /// leaves the newer task's registration untouched.
    pub fn complete(&self, uri: &Url, generation: u64) -> bool {
        let mut pending = self.pending.write().unwrap();
        match pending.get(uri) {
            Some((current, _)) if *current == generation => {
                pending.remove(uri);
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending scan for a URI
    pub fn cancel(&self, uri: &Url) {
        let mut pending = self.pending.write().unwrap();
        if let Some((_, token)) = pending.remove(uri) {
            token.cancel();
        }
    }

    /// Cancel all pending scans
    pub fn cancel_all(&self) {
        let mut pending = self.pending.write().unwrap();
        for (_, (_, token)) in pending.drain() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_uri(name: &str) -> Url {
        Url::parse(&format!("file:///{}", name)).unwrap()
    }

    #[test]
    fn schedule_returns_live_ticket() {
        let debouncer = ScanDebouncer::new();
        let ticket = debouncer.schedule(test_uri("app.vue"));
        assert!(!ticket.token.is_cancelled());
    }

    #[test]
    fn schedule_cancels_previous() {
        let debouncer = ScanDebouncer::new();
        let uri = test_uri("app.vue");

        let first = debouncer.schedule(uri.clone());
        let second = debouncer.schedule(uri);

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert_ne!(first.generation, second.generation);
    }

    #[test]
    fn schedule_is_per_uri() {
        let debouncer = ScanDebouncer::new();
        let a = debouncer.schedule(test_uri("a.vue"));
        let b = debouncer.schedule(test_uri("b.vue"));

        assert!(!a.token.is_cancelled());
        assert!(!b.token.is_cancelled());
    }

    #[test]
    fn current_completion_claim_retires_the_slot() {
        let debouncer = ScanDebouncer::new();
        let uri = test_uri("app.vue");

        let ticket = debouncer.schedule(uri.clone());
        assert!(debouncer.complete(&uri, ticket.generation));

        // Scheduling again should not cancel anything (no previous pending)
        let next = debouncer.schedule(uri);
        assert!(!next.token.is_cancelled());
    }

    #[test]
    fn stale_completion_claim_leaves_newer_task_registered() {
        let debouncer = ScanDebouncer::new();
        let uri = test_uri("app.vue");

        let superseded = debouncer.schedule(uri.clone());
        let newer = debouncer.schedule(uri.clone());

        // The superseded task's claim fails and must not evict the newer
        // registration.
        assert!(!debouncer.complete(&uri, superseded.generation));

        // A further event still supersedes the newer task, so bursts keep
        // coalescing.
        let third = debouncer.schedule(uri.clone());
        assert!(newer.token.is_cancelled());
        assert!(!third.token.is_cancelled());
        assert!(debouncer.complete(&uri, third.generation));
    }

    #[test]
    fn completion_cannot_be_claimed_twice() {
        let debouncer = ScanDebouncer::new();
        let uri = test_uri("app.vue");

        let ticket = debouncer.schedule(uri.clone());
        assert!(debouncer.complete(&uri, ticket.generation));
        assert!(!debouncer.complete(&uri, ticket.generation));
    }

    #[test]
    fn cancel_cancels_pending_and_voids_the_claim() {
        let debouncer = ScanDebouncer::new();
        let uri = test_uri("app.vue");

        let ticket = debouncer.schedule(uri.clone());
        debouncer.cancel(&uri);

        assert!(ticket.token.is_cancelled());
        assert!(!debouncer.complete(&uri, ticket.generation));
    }

    #[test]
    fn cancel_all_cancels_everything() {
        let debouncer = ScanDebouncer::new();
        let a = debouncer.schedule(test_uri("a.vue"));
        let b = debouncer.schedule(test_uri("b.vue"));

        debouncer.cancel_all();

        assert!(a.token.is_cancelled());
        assert!(b.token.is_cancelled());
    }
}
