//! # Inbound Port — GroupEventHandler
//!
//! Primary driving port, invoked by the host event dispatcher (directly or
//! through the subscriber adapter).

use async_trait::async_trait;
use chat_events::{GroupMessageEvent, NoticeEvent};

/// Driving port for host-dispatched group events.
///
/// Handlers are total: internal failures are logged and swallowed, and the
/// call returns normally, so a malformed event or a rejected platform call
/// can never take down the host dispatcher. The host may invoke handlers
/// concurrently, including twice for the same member; implementations must
/// resolve such races to exactly one side-effecting outcome.
#[async_trait]
pub trait GroupEventHandler: Send + Sync {
    /// Reacts to a membership notice.
    ///
    /// Only member-increase notices open verification sessions;
    /// implementations ignore every other notice kind.
    async fn on_member_joined(&self, notice: &NoticeEvent);

    /// Screens a group message.
    ///
    /// Messages from members without a pending session are unrelated to
    /// verification and must be left alone.
    async fn on_group_message(&self, message: &GroupMessageEvent);
}
