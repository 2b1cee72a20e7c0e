//! Centralized Testing Utilities
//!
//! Test doubles for the subsystem's outbound ports, public so host
//! integrations and the workspace test crate can drive the service
//! deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::Timestamp;
use crate::error::GatewayError;
use crate::ports::{GatewayCapability, PlatformGateway, TimeSource};

// Re-export the deterministic generator from adapters
pub use crate::adapters::FixedCodeGenerator;

/// Controllable time source for deterministic tests.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: AtomicU64,
}

impl MockTimeSource {
    /// Creates a mock clock at `initial` milliseconds.
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    /// Advances the clock by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, Ordering::SeqCst);
    }

    /// Advances the clock by `secs` seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance(secs * 1000);
    }

    /// Sets the clock to an absolute time.
    pub fn set(&self, time: Timestamp) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}

/// One recorded gateway call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    /// `send_private_message` was invoked.
    PrivateMessage { member_id: String, text: String },
    /// `send_group_message` was invoked.
    GroupMessage { group_id: String, text: String },
    /// `delete_message` was invoked.
    DeleteMessage { message_id: String },
    /// `remove_member` was invoked.
    RemoveMember {
        group_id: String,
        member_id: String,
        reject_rejoin: bool,
    },
}

/// Recording gateway: logs every call and optionally fails them all.
///
/// Failed calls are still recorded, so tests can assert that an attempt was
/// made even when exercising the best-effort error path.
pub struct RecordingGateway {
    capabilities: Vec<GatewayCapability>,
    calls: Mutex<Vec<GatewayCall>>,
    failing: bool,
}

impl RecordingGateway {
    /// Creates a gateway declaring every capability.
    pub fn new() -> Self {
        Self::with_capabilities(vec![
            GatewayCapability::SendMessage,
            GatewayCapability::DeleteMessage,
            GatewayCapability::RemoveMember,
        ])
    }

    /// Creates a gateway declaring only the given capabilities.
    pub fn with_capabilities(capabilities: Vec<GatewayCapability>) -> Self {
        Self {
            capabilities,
            calls: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    /// Creates a gateway whose every call returns an error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Snapshot of the recorded calls, in invocation order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recorded calls matching a predicate.
    pub fn calls_where(&self, pred: impl Fn(&GatewayCall) -> bool) -> Vec<GatewayCall> {
        self.calls().into_iter().filter(|c| pred(c)).collect()
    }

    fn record(&self, call: GatewayCall) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            Err(GatewayError::Rejected("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformGateway for RecordingGateway {
    fn name(&self) -> &str {
        "recording"
    }

    fn capabilities(&self) -> &[GatewayCapability] {
        &self.capabilities
    }

    async fn send_private_message(
        &self,
        member_id: &str,
        text: &str,
    ) -> Result<(), GatewayError> {
        self.record(GatewayCall::PrivateMessage {
            member_id: member_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn send_group_message(&self, group_id: &str, text: &str) -> Result<(), GatewayError> {
        self.record(GatewayCall::GroupMessage {
            group_id: group_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn delete_message(&self, message_id: &str) -> Result<(), GatewayError> {
        self.record(GatewayCall::DeleteMessage {
            message_id: message_id.to_string(),
        })
    }

    async fn remove_member(
        &self,
        group_id: &str,
        member_id: &str,
        reject_rejoin: bool,
    ) -> Result<(), GatewayError> {
        self.record(GatewayCall::RemoveMember {
            group_id: group_id.to_string(),
            member_id: member_id.to_string(),
            reject_rejoin,
        })
    }
}
