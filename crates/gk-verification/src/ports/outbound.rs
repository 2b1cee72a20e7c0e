//! Outbound (driven) ports for the verification subsystem.
//!
//! These traits define dependencies on external systems: the chat platform
//! that delivers messages and removes members, the clock, and the entropy
//! source behind challenge codes. Each is abstracted so tests can substitute
//! deterministic doubles.

use std::fmt;

use async_trait::async_trait;

use crate::domain::Timestamp;
use crate::error::GatewayError;

/// Side-effecting operations a platform adapter can provide.
///
/// The registry matches controllers to adapters on declared capabilities,
/// never on adapter names, so adding a platform does not touch controller
/// logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GatewayCapability {
    /// Deliver private and group messages.
    SendMessage,
    /// Delete (recall) a message in a group.
    DeleteMessage,
    /// Remove a member from a group.
    RemoveMember,
}

impl fmt::Display for GatewayCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendMessage => write!(f, "send-message"),
            Self::DeleteMessage => write!(f, "delete-message"),
            Self::RemoveMember => write!(f, "remove-member"),
        }
    }
}

/// Chat-platform gateway.
///
/// All calls are best-effort from the controller's perspective: results are
/// logged at the call site and local state transitions proceed regardless of
/// the outcome. A call runs to completion or failure — the subsystem never
/// aborts, times out, or retries it; only the verification window itself is
/// time-bounded.
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Adapter name, for logs.
    fn name(&self) -> &str;

    /// Capabilities this adapter declares.
    fn capabilities(&self) -> &[GatewayCapability];

    /// Sends a direct (private) message to a member.
    async fn send_private_message(&self, member_id: &str, text: &str)
        -> Result<(), GatewayError>;

    /// Posts a message visible to the whole group.
    async fn send_group_message(&self, group_id: &str, text: &str) -> Result<(), GatewayError>;

    /// Deletes a message from its group.
    async fn delete_message(&self, message_id: &str) -> Result<(), GatewayError>;

    /// Removes a member from a group.
    ///
    /// `reject_rejoin` forwards the platform's "reject future join requests"
    /// flag; the verification flow always passes `false` — a kicked member
    /// may rejoin and try again.
    async fn remove_member(
        &self,
        group_id: &str,
        member_id: &str,
        reject_rejoin: bool,
    ) -> Result<(), GatewayError>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current time in milliseconds since UNIX epoch.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Source of challenge codes.
///
/// Implementations must draw uniformly over the decimal digits and must not
/// be derivable from observable state such as timestamps: the echo channel
/// is a public group chat, and a 6-digit space is small enough that a
/// predictable generator lets another member front-run the code inside the
/// window.
pub trait CodeGenerator: Send + Sync {
    /// Returns exactly `length` decimal-digit characters.
    fn generate(&self, length: usize) -> String;
}
