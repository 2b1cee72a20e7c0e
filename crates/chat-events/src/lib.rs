//! # Chat Events
//!
//! Inbound event model shared between the host event dispatcher and the
//! subsystems it drives.
//!
//! The host receives raw platform traffic, normalizes it into [`ChatEvent`]
//! values, and hands them to subscribed subsystems. Two kinds of traffic are
//! distinguished:
//!
//! - **Notice events** — out-of-band signals reporting membership changes
//!   (a member joined, a member left), never chat text.
//! - **Group messages** — ordinary chat messages posted in a group.
//!
//! Subsystems narrow delivery with an [`EventFilter`] over [`EventTopic`]s
//! and, optionally, specific groups.

pub mod events;

pub use events::{
    ChatEvent, EventFilter, EventTopic, GroupId, GroupMessageEvent, MemberId, MessageId,
    NoticeEvent, NoticeKind,
};
