//! In-memory session table keyed by member id.

use dashmap::DashMap;
use tracing::debug;

use crate::domain::session::{MemberId, Timestamp, VerificationSession};

/// Keyed table of pending verification sessions.
///
/// The verification service is the single logical owner, but the host may
/// invoke handlers concurrently — including twice for the same member — so
/// resolution goes through the `claim_*` helpers, which are atomic per key:
/// of N racing resolutions for one member, exactly one receives the session
/// and the rest observe it as absent. No locks span different member keys,
/// and no shard guard ever escapes a method (sessions are cloned out).
///
/// The table is process-local and non-persistent. Nothing evicts entries
/// except explicit removal, a winning claim, or [`sweep_expired`]
/// (opt-in; see the service). An expired session for a member who never
/// posts again therefore stays resident until process exit — a documented,
/// tolerated property.
///
/// [`sweep_expired`]: SessionStore::sweep_expired
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<MemberId, VerificationSession>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the session for its member id.
    ///
    /// Last write wins: a member who re-joins while still pending gets a
    /// fresh code and window, and the old session is gone. No error
    /// conditions.
    pub fn create(&self, session: VerificationSession) {
        debug!(
            member_id = %session.member_id,
            group_id = %session.group_id,
            "session created"
        );
        self.sessions.insert(session.member_id.clone(), session);
    }

    /// Pure lookup; clones the session out.
    pub fn get(&self, member_id: &str) -> Option<VerificationSession> {
        self.sessions.get(member_id).map(|entry| entry.clone())
    }

    /// Removes the member's session. Idempotent; absent keys are not an
    /// error.
    pub fn remove(&self, member_id: &str) {
        self.sessions.remove(member_id);
    }

    /// Atomically removes and returns the member's session iff it is expired
    /// at `now`.
    ///
    /// This is the claim step of timeout resolution: the check and the
    /// removal happen under the key's shard lock, so concurrent claimants
    /// cannot both win.
    pub fn claim_expired(&self, member_id: &str, now: Timestamp) -> Option<VerificationSession> {
        self.sessions
            .remove_if(member_id, |_, session| session.is_expired(now))
            .map(|(_, session)| session)
    }

    /// Atomically removes and returns the member's session iff `text`
    /// verifies it (byte-exact code match after trimming).
    ///
    /// The claim step of success resolution; same single-winner guarantee as
    /// [`claim_expired`](SessionStore::claim_expired).
    pub fn claim_verified(&self, member_id: &str, text: &str) -> Option<VerificationSession> {
        self.sessions
            .remove_if(member_id, |_, session| session.accepts(text))
            .map(|(_, session)| session)
    }

    /// Removes and returns every session expired at `now`.
    ///
    /// Only the opt-in expiry sweep calls this; the default policy detects
    /// expiry lazily on the member's next message.
    pub fn sweep_expired(&self, now: Timestamp) -> Vec<VerificationSession> {
        let mut removed = Vec::new();
        self.sessions.retain(|_, session| {
            if session.is_expired(now) {
                removed.push(session.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            debug!(count = removed.len(), "expired sessions swept");
        }
        removed
    }

    /// Whether the member has a pending session.
    pub fn contains(&self, member_id: &str) -> bool {
        self.sessions.contains_key(member_id)
    }

    /// Number of pending sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True if no sessions are pending.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
