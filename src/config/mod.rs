//! Configuration
//!
//! Figment-layered settings for service locations, timeouts, retry, cache,
//! upload and progress. See [`ConfigLoader`] for the resolution order.

mod loader;
mod types;

pub use loader::{ConfigLoader, ConfigSource};
pub use types::*;
