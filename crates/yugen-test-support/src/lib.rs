//! Shared test doubles and fixtures for the Yugen novel companion.

mod clock;
mod failing;
pub mod fixtures;
mod memory;

pub use clock::FixedClock;
pub use failing::FailingStore;
pub use memory::InMemoryStore;
