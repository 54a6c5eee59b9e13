//! Test utilities for the guildstore workspace
//!
//! - `fixtures`: predictable ids and entities for unit tests
//! - `failing`: store implementations that always fail, for exercising the
//!   gateway's error boundary
//! - `generators`: proptest strategies over entity values

pub mod failing;
pub mod fixtures;
pub mod generators;

pub use failing::FailingStore;
pub use fixtures::*;
