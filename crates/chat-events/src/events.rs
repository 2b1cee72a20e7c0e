//! Event types delivered by the host dispatcher.

use serde::{Deserialize, Serialize};

/// Opaque platform identifier of a user.
pub type MemberId = String;

/// Opaque platform identifier of a group.
pub type GroupId = String;

/// Opaque platform identifier of a single message.
pub type MessageId = String;

/// Discriminator on a notice event.
///
/// Platforms report many notice subtypes; subsystems match on the kinds they
/// care about and ignore the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// A member joined a group.
    MemberIncrease,
    /// A member left or was removed from a group.
    MemberDecrease,
    /// Any other notice subtype (recalls, admin changes, ...).
    Other,
}

/// An out-of-band membership notice, distinct from a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeEvent {
    /// Notice subtype discriminator.
    pub kind: NoticeKind,
    /// The member the notice is about.
    pub member_id: MemberId,
    /// The group the notice applies to.
    pub group_id: GroupId,
}

/// A chat message posted in a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMessageEvent {
    /// Platform id of the sender.
    pub sender_id: MemberId,
    /// Display name of the sender, as the platform reports it.
    pub sender_name: String,
    /// The group the message was posted in.
    pub group_id: GroupId,
    /// Plain-text content of the message.
    pub text: String,
    /// Platform id of this message (used for deletion).
    pub message_id: MessageId,
}

/// All events the host dispatcher can deliver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A membership notice.
    Notice(NoticeEvent),
    /// A group chat message.
    GroupMessage(GroupMessageEvent),
}

impl ChatEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Notice(_) => EventTopic::Notice,
            Self::GroupMessage(_) => EventTopic::GroupMessage,
        }
    }

    /// The group this event belongs to.
    #[must_use]
    pub fn group_id(&self) -> &str {
        match self {
            Self::Notice(notice) => &notice.group_id,
            Self::GroupMessage(message) => &message.group_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Membership notices.
    Notice,
    /// Group chat messages.
    GroupMessage,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Groups to include. Empty means all groups.
    pub groups: Vec<GroupId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            groups: Vec::new(),
        }
    }

    /// Create a filter for events from specific groups.
    #[must_use]
    pub fn for_groups(groups: Vec<GroupId>) -> Self {
        Self {
            topics: Vec::new(),
            groups,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ChatEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let group_match =
            self.groups.is_empty() || self.groups.iter().any(|g| g == event.group_id());

        topic_match && group_match
    }
}
