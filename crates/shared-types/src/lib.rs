//! # Shared Types Crate
//!
//! Primitive identifiers and the `ChainEvent` record handed to the
//! reconstruction engine by the upstream log delivery.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the event shape consumed by the engine is
//!   defined once, here, so delivery adapters and the engine cannot drift.
//! - **Closed Event Set**: `EventKind` is a tagged union; adding a kind is a
//!   compile error in every exhaustive `match` that must handle it.

pub mod entities;
pub mod events;

pub use entities::*;
pub use events::*;
