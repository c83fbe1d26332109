//! Poll scheduling
//!
//! Fixed-interval timers driven by the caller's millisecond clock. The
//! driver runs three of them: UART exchange, control step and publish.

pub mod poll;

pub use poll::{elapsed_ms, is_due, PollTimer};
