//! # Ports Layer
//!
//! Hexagonal architecture ports (interfaces) for the reconstruction engine.
//!
//! - **Driving Ports (Inbound)**: event ingestion and the read-only query
//!   contract the UI/query layer depends on.
//! - **Driven Ports (Outbound)**: the entity store and the chain reader.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
