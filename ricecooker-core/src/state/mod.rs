//! Driver state
//!
//! `DeviceState` holds the last accepted status frame; `LinkState` tracks
//! how far the UART link has come up.

pub mod device;
pub mod link;

pub use device::DeviceState;
pub use link::{LinkEvent, LinkState};
