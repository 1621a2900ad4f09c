//! # Dispute Tree Indexer Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Service harness over the in-memory adapters
//! └── integration/      # End-to-end event flows
//!     ├── scenarios.rs  # Full tournament lifecycles
//!     ├── ordering.rs   # Out-of-order and duplicate delivery
//!     ├── hierarchy.rs  # Inner tournaments and address reuse
//!     └── concurrency.rs# Parallel dispatch across addresses
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dt-tests
//! cargo test -p dt-tests integration::ordering
//! cargo bench -p dt-tests
//! ```

pub mod fixtures;
