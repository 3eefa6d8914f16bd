//! # Integration Tests Crate
//!
//! End-to-end scenarios exercising the assembled service: the contract
//! state machine, the dual-signature protocol, replication behavior under
//! remote outages, and the HTTP surface with its status-code mapping.
//!
//! ## Structure
//!
//! ```text
//! integration-tests/
//! ├── src/
//! │   ├── lib.rs        # This file + re-exports
//! │   ├── harness.rs    # Shared environment and signing helpers
//! │   ├── scenarios.rs  # Service-level lifecycle scenarios
//! │   └── http_api.rs   # Router-level wire tests
//! ```

pub mod harness;

#[cfg(test)]
mod http_api;
#[cfg(test)]
mod scenarios;

pub use harness::TestEnv;
