//! # Adapters Layer
//!
//! Reference implementations of the outbound ports.

pub mod chain_reader;
pub mod memory_store;

pub use chain_reader::StaticChainReader;
pub use memory_store::{InMemoryEntityStore, MemoryTransaction, StoreSnapshot};
