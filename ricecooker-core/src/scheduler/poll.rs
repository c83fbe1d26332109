//! Fixed-interval poll timer
//!
//! Timestamps are `u32` milliseconds from an arbitrary epoch and may wrap;
//! every comparison goes through [`is_due`] / [`elapsed_ms`].

/// Milliseconds from `since` to `now`, wrap-safe
pub fn elapsed_ms(now_ms: u32, since_ms: u32) -> u32 {
    now_ms.wrapping_sub(since_ms)
}

/// True once `now_ms` has reached `due_ms`
///
/// Valid while the two are less than 2^31 ms (~24 days) apart.
pub fn is_due(now_ms: u32, due_ms: u32) -> bool {
    (now_ms.wrapping_sub(due_ms) as i32) >= 0
}

/// Timer that fires at most once per interval
///
/// A late call fires once and skips the missed intervals instead of
/// replaying them, keeping the original phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollTimer {
    interval_ms: u32,
    next_due_ms: u32,
}

impl PollTimer {
    /// Create a timer whose first fire is one full interval after `now_ms`
    ///
    /// A zero interval is treated as 1 ms.
    pub fn new(now_ms: u32, interval_ms: u32) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            interval_ms,
            next_due_ms: now_ms.wrapping_add(interval_ms),
        }
    }

    /// Configured interval
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time of the next fire
    pub fn next_due_ms(&self) -> u32 {
        self.next_due_ms
    }

    /// Milliseconds until the next fire, 0 when already due
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        if is_due(now_ms, self.next_due_ms) {
            0
        } else {
            self.next_due_ms.wrapping_sub(now_ms)
        }
    }

    /// Re-arm so the next fire is one interval after `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.next_due_ms = now_ms.wrapping_add(self.interval_ms);
    }

    /// Returns true if the timer is due, and advances it
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if !is_due(now_ms, self.next_due_ms) {
            return false;
        }

        self.next_due_ms = self.next_due_ms.wrapping_add(self.interval_ms);

        if is_due(now_ms, self.next_due_ms) {
            // Missed whole intervals: jump past them
            let behind = elapsed_ms(now_ms, self.next_due_ms);
            let skipped = behind / self.interval_ms + 1;
            self.next_due_ms = self
                .next_due_ms
                .wrapping_add(skipped.wrapping_mul(self.interval_ms));
        }

        true
    }
}
