//! # Group-Join Verification Subsystem
//!
//! Challenges every newly joined group member with a one-time numeric code
//! and screens their group messages until they echo it back.
//!
//! ## Flow
//!
//! ```text
//! [member joins] ──→ issue code, open session, DM the member
//!                                 │
//! [member posts] ──→ session? ────┼── expired  ──→ kick + group notice
//!                      │          ├── mismatch ──→ delete message + reminder
//!                      no-op      └── match    ──→ welcome, session closed
//! ```
//!
//! Sessions are transient and in-memory; nothing survives a restart. Expiry
//! is detected lazily on the member's next group message — there is no timer
//! unless the host opts into the sweep (see [`service::sweep_task`]).
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  adapters/ - gateway registry, code generators, subscriber     │
//! └────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - GroupEventHandler trait                   │
//! │  ports/outbound.rs - PlatformGateway, TimeSource, CodeGenerator│
//! └────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  domain/session.rs - VerificationSession entity                │
//! │  domain/store.rs   - SessionStore keyed table                  │
//! │  service.rs        - VerificationService handlers              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract with the host dispatcher
//!
//! Handlers never raise: every platform failure is logged and swallowed at
//! the boundary, so nothing this subsystem does can destabilize unrelated
//! event processing in the host.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod testing;

// Re-export main types
pub use adapters::{EventSubscriber, FixedCodeGenerator, GatewayRegistry, OsRngCodeGenerator};
pub use config::VerificationConfig;
pub use domain::{SessionStore, Timestamp, VerificationSession};
pub use error::{GatewayError, Result, VerificationError};
pub use ports::{
    CodeGenerator, GatewayCapability, GroupEventHandler, PlatformGateway, SystemTimeSource,
    TimeSource,
};
pub use service::VerificationService;

/// Default number of decimal digits in a verification code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default verification window in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
