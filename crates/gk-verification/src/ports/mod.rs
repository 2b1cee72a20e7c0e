//! Ports (hexagonal boundary) for the verification subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::GroupEventHandler;
pub use outbound::{
    CodeGenerator, GatewayCapability, PlatformGateway, SystemTimeSource, TimeSource,
};
