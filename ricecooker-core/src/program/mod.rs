//! Cooking programs
//!
//! A program decides the heater target for each control step. It never
//! switches the relay itself beyond what [`PowerModulator`] offers; the
//! driver applies the resulting relay state to the next control frame.

pub mod keep_warm;
pub mod rice;

pub use keep_warm::{KeepWarm, WarmStage};
pub use rice::{RiceProgram, RiceStage};

use crate::heater::PowerModulator;

/// What the driver should do after a program step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Keep running this program
    Continue,
    /// Something went wrong; drop the program and switch the heater off
    Abort,
    /// Replace this program with another, already started, one
    Handover(Program),
}

/// Available programs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Program {
    KeepWarm(KeepWarm),
    Rice(RiceProgram),
}

impl Program {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Program::KeepWarm(_) => "Keep Warm",
            Program::Rice(rice) if rice.is_fast() => "Fast Rice",
            Program::Rice(_) => "Rice",
        }
    }

    /// Start from the beginning, even if previously cancelled mid-way
    pub fn start(&mut self, now_ms: u32) {
        match self {
            Program::KeepWarm(p) => p.start(),
            Program::Rice(p) => p.start(now_ms),
        }
    }

    /// Return to the waiting stage
    pub fn cancel(&mut self, now_ms: u32) {
        match self {
            Program::KeepWarm(p) => p.cancel(),
            Program::Rice(p) => p.cancel(now_ms),
        }
    }

    /// Estimated minutes left; `None` for open-ended or waiting programs
    pub fn remaining_time_min(&self, now_ms: u32) -> Option<u32> {
        match self {
            Program::KeepWarm(_) => None,
            Program::Rice(p) => p.remaining_time_min(now_ms),
        }
    }

    /// Run one control step
    ///
    /// `heater` must already hold the latest temperatures.
    pub fn step(&mut self, now_ms: u32, heater: &mut PowerModulator) -> StepOutcome {
        match self {
            Program::KeepWarm(p) => {
                p.step(heater);
                StepOutcome::Continue
            }
            Program::Rice(p) => p.step(now_ms, heater),
        }
    }
}

impl From<KeepWarm> for Program {
    fn from(program: KeepWarm) -> Self {
        Program::KeepWarm(program)
    }
}

impl From<RiceProgram> for Program {
    fn from(program: RiceProgram) -> Self {
        Program::Rice(program)
    }
}
