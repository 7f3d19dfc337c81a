//! # Blokka Test Suite
//!
//! Cross-crate flows driven through real node actors.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # Transaction and chain builders, polling helpers
//!     ├── e2e.rs          # Two peered nodes mining and adopting each other's blocks
//!     ├── gossip.rs       # Cyclic peer graphs, unreachable and stopped peers
//!     └── persistence.rs  # File-backed chains across restarts, runtime flow
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bk-tests
//! cargo test -p bk-tests integration::gossip::
//! ```

#![allow(dead_code)]

pub mod integration;
