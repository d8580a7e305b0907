//! Runtime capabilities consumed by the triage core
//!
//! Persistence and speech I/O live outside the core; these seams let the
//! Event Store and the voice session run against real adapters or mocks.

pub mod traits;

#[cfg(test)]
pub mod testing;

pub use traits::*;
