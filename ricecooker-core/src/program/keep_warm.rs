//! Keep-warm program: hold the pot at a fixed temperature

use crate::heater::PowerModulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WarmStage {
    Waiting,
    Warming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeepWarm {
    target_c: u8,
    hysteresis_c: u8,
    stage: WarmStage,
}

impl KeepWarm {
    /// Create a waiting program
    pub fn new(target_c: u8, hysteresis_c: u8) -> Self {
        Self {
            target_c,
            hysteresis_c,
            stage: WarmStage::Waiting,
        }
    }

    /// Create a program that is already warming
    pub fn started(target_c: u8, hysteresis_c: u8) -> Self {
        let mut program = Self::new(target_c, hysteresis_c);
        program.start();
        program
    }

    pub fn start(&mut self) {
        self.stage = WarmStage::Warming;
    }

    pub fn cancel(&mut self) {
        self.stage = WarmStage::Waiting;
    }

    pub fn stage(&self) -> WarmStage {
        self.stage
    }

    pub fn target_c(&self) -> u8 {
        self.target_c
    }

    pub(crate) fn step(&mut self, heater: &mut PowerModulator) {
        match self.stage {
            WarmStage::Waiting => {
                trace!(
                    "Keep warm waiting: top {} C, bottom {} C",
                    heater.top_temperature(),
                    heater.bottom_temperature()
                );
                heater.clear_target();
            }
            WarmStage::Warming => {
                trace!(
                    "Keep warm: top {} C, bottom {} C, target {} C",
                    heater.top_temperature(),
                    heater.bottom_temperature(),
                    self.target_c
                );
                heater.set_target(self.target_c, self.hysteresis_c);
            }
        }
    }
}
