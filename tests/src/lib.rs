//! # Content Node Test Suite
//!
//! Unified test crate for lifecycle flows that span every subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── doubles.rs        # Recording SubsystemFactory with failure injection
//! └── integration/      # Construction and teardown flows
//!     ├── construction.rs
//!     └── teardown.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p node-tests
//!
//! # By flow
//! cargo test -p node-tests integration::construction::
//! cargo test -p node-tests integration::teardown::
//! ```

pub mod doubles;
