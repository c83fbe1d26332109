//! Configuration types
//!
//! Validated once when the driver is built. Behind the `serde` feature the
//! configuration can be stored as postcard binary data.

pub mod types;

pub use types::*;
