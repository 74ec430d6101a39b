//! Bidirectional store/URL synchronization.
//!
//! Two write directions exist. Store changes are encoded and written to the
//! URL (outbound); URL changes from navigation are decoded into the store
//! (inbound). Each direction would trigger the other, so [`UrlSync`] keeps an
//! explicit phase that names the transition in flight:
//!
//! ```text
//!            outbound write           echo of the newest pending write
//!   Idle ───────────────────▶ SyncingOut ────────────────────────────────▶ Idle
//!    │                         │  ▲   │
//!    │                         └──┘   │ navigation (matches no pending write)
//!    │ navigation      more writes,   │
//!    ▼                 older echoes   │
//!  SyncingIn ◀────────────────────────┘
//!    │
//!    │ outbound after apply (suppressed)
//!    ▼
//!   Idle
//! ```
//!
//! Every write still awaiting its notification is remembered, oldest first,
//! so gestures made faster than the host reports its URL changes are never
//! mistaken for navigation. A URL write never feeds back into the store and a
//! URL-originated store change never writes the URL again.

use crate::query::QueryString;
use std::collections::VecDeque;

/// Writes remembered while their notifications are outstanding. Older
/// entries are dropped beyond this, for hosts that never report writes.
pub const MAX_PENDING_WRITES: usize = 16;

/// Transition currently in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncPhase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// URL writes were issued and their change notifications have not all
    /// arrived.
    SyncingOut {
        /// Written queries awaiting their echo, oldest first.
        pending: VecDeque<QueryString>,
    },
    /// A URL was decoded into the store; the store's change must not be
    /// written back.
    SyncingIn {
        /// The query that was applied.
        applied: QueryString,
    },
}

/// What to do with an incoming URL change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// The change is the echo of one of our own writes; drop it.
    Echo,
    /// The URL carries the parameters already reflected in the store.
    Unchanged,
    /// Navigation: decode the query into the store, then call
    /// [`UrlSync::outbound`] once so the phase returns to idle.
    Apply,
}

/// Coordinates URL writes and URL change notifications.
#[derive(Debug, Clone, Default)]
pub struct UrlSync {
    phase: SyncPhase,
    current: QueryString,
}

impl UrlSync {
    /// Starts idle with `initial` as the known URL, as after a cold load.
    #[must_use]
    pub fn new(initial: QueryString) -> Self {
        Self {
            phase: SyncPhase::Idle,
            current: initial,
        }
    }

    /// Phase currently in flight.
    #[must_use]
    pub const fn phase(&self) -> &SyncPhase {
        &self.phase
    }

    /// Last query written or applied.
    #[must_use]
    pub const fn current_url(&self) -> &QueryString {
        &self.current
    }

    /// Decides whether the encoded store state must be written to the URL.
    ///
    /// Returns the query to write, or `None` when the change came from the
    /// URL itself or the URL already carries these parameters. A write issued
    /// while earlier ones are unconfirmed is queued behind them.
    pub fn outbound(&mut self, query: QueryString) -> Option<QueryString> {
        if let SyncPhase::SyncingIn { applied } = &self.phase {
            tracing::debug!(applied = %applied, "suppressing write for url-originated change");
            self.phase = SyncPhase::Idle;
            return None;
        }

        if query.same_params(&self.current) {
            return None;
        }

        tracing::debug!(query = %query, "writing url");
        self.current = query.clone();
        match &mut self.phase {
            SyncPhase::SyncingOut { pending } => {
                if pending.len() == MAX_PENDING_WRITES {
                    pending.pop_front();
                }
                pending.push_back(query.clone());
                tracing::trace!(pending = pending.len(), "url writes awaiting echo");
            }
            phase => {
                *phase = SyncPhase::SyncingOut {
                    pending: VecDeque::from([query.clone()]),
                };
            }
        }
        Some(query)
    }

    /// Classifies a URL change notification.
    ///
    /// A notification matching a pending write is its echo; that write and
    /// every older one are settled. Anything else is navigation, which wins
    /// over all pending writes.
    pub fn inbound(&mut self, query: &QueryString) -> Inbound {
        let previous = std::mem::take(&mut self.phase);

        if let SyncPhase::SyncingOut { mut pending } = previous {
            if let Some(position) = pending.iter().position(|p| p.same_params(query)) {
                pending.drain(..=position);
                tracing::debug!(query = %query, remaining = pending.len(), "ignoring echo of own url write");
                if !pending.is_empty() {
                    self.phase = SyncPhase::SyncingOut { pending };
                }
                return Inbound::Echo;
            }
            tracing::debug!(discarded = pending.len(), "navigation overrides pending url writes");
        }

        if query.same_params(&self.current) {
            return Inbound::Unchanged;
        }

        tracing::debug!(query = %query, "applying navigation");
        self.current = query.clone();
        self.phase = SyncPhase::SyncingIn {
            applied: query.clone(),
        };
        Inbound::Apply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(raw: &str) -> QueryString {
        QueryString::new(raw)
    }

    #[test]
    fn write_then_echo_settles_idle() {
        let mut sync = UrlSync::default();
        assert_eq!(sync.outbound(q("brand=Cola")), Some(q("brand=Cola")));
        assert!(matches!(sync.phase(), SyncPhase::SyncingOut { .. }));
        assert_eq!(sync.inbound(&q("brand=Cola")), Inbound::Echo);
        assert_eq!(sync.phase(), &SyncPhase::Idle);
    }

    #[test]
    fn unchanged_query_is_not_written() {
        let mut sync = UrlSync::new(q("sort=newest"));
        assert_eq!(sync.outbound(q("sort=newest")), None);
        assert_eq!(sync.phase(), &SyncPhase::Idle);
    }

    #[test]
    fn navigation_suppresses_the_following_write() {
        let mut sync = UrlSync::new(q("brand=Cola"));
        assert_eq!(sync.inbound(&q("brand=Sprite")), Inbound::Apply);
        assert_eq!(sync.outbound(q("brand=Sprite")), None);
        assert_eq!(sync.phase(), &SyncPhase::Idle);
        assert_eq!(sync.current_url(), &q("brand=Sprite"));
    }

    #[test]
    fn navigation_wins_over_pending_write() {
        let mut sync = UrlSync::default();
        sync.outbound(q("brand=Cola"));
        assert_eq!(sync.inbound(&q("type=Juice")), Inbound::Apply);
        assert!(matches!(sync.phase(), SyncPhase::SyncingIn { .. }));
    }

    #[test]
    fn later_write_queues_behind_pending_one() {
        let mut sync = UrlSync::default();
        sync.outbound(q("brand=Cola"));
        assert_eq!(sync.outbound(q("brand=Cola&sort=newest")), Some(q("brand=Cola&sort=newest")));

        assert_eq!(sync.inbound(&q("brand=Cola")), Inbound::Echo);
        assert!(matches!(sync.phase(), SyncPhase::SyncingOut { pending } if pending.len() == 1));
        assert_eq!(sync.inbound(&q("sort=newest&brand=Cola")), Inbound::Echo);
        assert_eq!(sync.phase(), &SyncPhase::Idle);
    }

    #[test]
    fn echo_of_newer_write_settles_older_ones() {
        let mut sync = UrlSync::default();
        sync.outbound(q("brand=Cola"));
        sync.outbound(q("brand=Fanta"));
        sync.outbound(q("brand=Cola"));

        assert_eq!(sync.inbound(&q("brand=Fanta")), Inbound::Echo);
        assert_eq!(sync.inbound(&q("brand=Cola")), Inbound::Echo);
        assert_eq!(sync.phase(), &SyncPhase::Idle);
        // A late duplicate of the first write is now just the current URL.
        assert_eq!(sync.inbound(&q("brand=Cola")), Inbound::Unchanged);
    }

    #[test]
    fn pending_writes_are_bounded() {
        let mut sync = UrlSync::default();
        for n in 0..=MAX_PENDING_WRITES {
            sync.outbound(q(&format!("q={n}")));
        }
        match sync.phase() {
            SyncPhase::SyncingOut { pending } => {
                assert_eq!(pending.len(), MAX_PENDING_WRITES);
                assert_eq!(pending.front(), Some(&q("q=1")));
            }
            phase => panic!("unexpected phase {phase:?}"),
        }
    }

    #[test]
    fn repeated_notification_of_current_url_is_unchanged() {
        let mut sync = UrlSync::new(q("q=lime"));
        assert_eq!(sync.inbound(&q("q=lime")), Inbound::Unchanged);
        assert_eq!(sync.phase(), &SyncPhase::Idle);
    }
}
