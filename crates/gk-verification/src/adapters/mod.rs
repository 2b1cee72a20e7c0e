//! Adapters implementing the subsystem's ports.

pub mod random;
pub mod registry;
pub mod subscriber;

pub use random::{FixedCodeGenerator, OsRngCodeGenerator};
pub use registry::GatewayRegistry;
pub use subscriber::EventSubscriber;
