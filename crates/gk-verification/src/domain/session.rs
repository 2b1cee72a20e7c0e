//! Core domain entity: the pending-verification session.

// Re-export from chat-events for convenience
pub use chat_events::{GroupId, MemberId};

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// A pending verification challenge for one group member.
///
/// Lifecycle: created when a member-increase notice arrives, removed on the
/// first of (a) the correct code being received, (b) expiry being detected on
/// a later message from the member, or (c) explicit deletion. At most one
/// session exists per member at any time; a newer join replaces the old
/// session wholesale (last write wins, no merge).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationSession {
    /// The member being verified (unique key).
    pub member_id: MemberId,
    /// The group the member joined.
    pub group_id: GroupId,
    /// Decimal-digit challenge code the member must echo back.
    pub code: String,
    /// When the code was issued (ms).
    pub issued_at: Timestamp,
    /// Window length after issuance during which the code is accepted.
    pub timeout_secs: u64,
}

impl VerificationSession {
    /// Creates a new pending session.
    pub fn new(
        member_id: impl Into<MemberId>,
        group_id: impl Into<GroupId>,
        code: impl Into<String>,
        issued_at: Timestamp,
        timeout_secs: u64,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            group_id: group_id.into(),
            code: code.into(),
            issued_at,
            timeout_secs,
        }
    }

    /// True once the verification window has elapsed at `now`.
    ///
    /// The boundary is exclusive: a message arriving exactly at
    /// `issued_at + timeout` is still inside the window.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.saturating_sub(self.issued_at) > self.timeout_secs.saturating_mul(1000)
    }

    /// Whether `text` verifies this session.
    ///
    /// Comparison is byte-exact after stripping surrounding whitespace from
    /// the incoming text. The stored code is generated digits and is never
    /// trimmed.
    pub fn accepts(&self, text: &str) -> bool {
        text.trim() == self.code
    }
}
