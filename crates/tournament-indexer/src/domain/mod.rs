//! # Domain Layer
//!
//! Pure dispute-tree logic: entities and their state machines, identity
//! derivation, calldata decoding and resolution rules.
//!
//! ## Hexagonal Architecture
//!
//! This module contains NO I/O dependencies. Storage and chain access are
//! abstracted through ports in the `ports` module.

pub mod calldata;
pub mod entities;
pub mod identity;
pub mod resolution;

pub use calldata::*;
pub use entities::*;
pub use identity::*;
pub use resolution::*;
