//! Error types for the verification subsystem.

use thiserror::Error;

use crate::ports::GatewayCapability;

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, VerificationError>;

/// Failures surfaced by platform gateway adapters.
///
/// Always handled at the call site: logged with member/group context and
/// never propagated past a handler entry point, so the host dispatcher never
/// observes a fault from this subsystem. The local state transition proceeds
/// regardless of the outcome.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The platform accepted the call but refused to perform it.
    #[error("platform rejected the call: {0}")]
    Rejected(String),

    /// The call never reached the platform.
    #[error("transport failure: {0}")]
    Transport(String),

    /// No registered adapter declares the needed capability.
    #[error("no registered gateway adapter provides {0}")]
    MissingCapability(GatewayCapability),
}

/// Errors that can occur in the verification subsystem.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
