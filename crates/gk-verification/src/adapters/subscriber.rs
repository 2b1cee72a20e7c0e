//! Host-event subscriber adapter.
//!
//! Receives the host dispatcher's event stream, narrows it with an
//! [`EventFilter`], and routes what remains to the inbound port. Everything
//! this subsystem does not consume is dropped before it reaches the
//! controller.

use std::sync::Arc;

use chat_events::{ChatEvent, EventFilter, EventTopic, GroupId, NoticeKind};

use crate::ports::GroupEventHandler;

/// Routes host events to a [`GroupEventHandler`].
pub struct EventSubscriber {
    handler: Arc<dyn GroupEventHandler>,
    filter: EventFilter,
}

impl EventSubscriber {
    /// Subscribes the handler to the notice and group-message topics across
    /// all groups.
    pub fn new(handler: Arc<dyn GroupEventHandler>) -> Self {
        Self {
            handler,
            filter: EventFilter::topics(vec![EventTopic::Notice, EventTopic::GroupMessage]),
        }
    }

    /// Restricts delivery to the given groups.
    #[must_use]
    pub fn for_groups(mut self, groups: Vec<GroupId>) -> Self {
        self.filter.groups = groups;
        self
    }

    /// Routes one host event.
    ///
    /// Member-increase notices and group messages reach the handler;
    /// non-increase notices report membership changes that are none of this
    /// subsystem's business and are dropped here.
    pub async fn handle(&self, event: &ChatEvent) {
        if !self.filter.matches(event) {
            return;
        }

        match event {
            ChatEvent::Notice(notice) if notice.kind == NoticeKind::MemberIncrease => {
                self.handler.on_member_joined(notice).await;
            }
            ChatEvent::Notice(_) => {}
            ChatEvent::GroupMessage(message) => {
                self.handler.on_group_message(message).await;
            }
        }
    }
}
