//! Rice program
//!
//! ```text
//! Waiting ─start─▶ Start ──▶ Soak ──▶ Heat ──▶ Cook ──▶ Vapor ──▶ Rest ──▶ KeepWarm(65 ±2)
//!                 to 60 °C   65 ±5 °C  95 ±2 °C  T ±1 °C   T → 120 °C  65 ±4 °C
//!                            45 min    ≤30 min   t/2       t/2         10 min
//! ```
//!
//! `T` is the cooking temperature (default 100 °C) and `t` the cooking
//! time. Fast rice skips the soak and cuts the rest to a single step. A
//! Heat stage that does not reach temperature within 30 minutes aborts the
//! program.

use crate::heater::PowerModulator;
use crate::program::{KeepWarm, Program, StepOutcome};
use crate::scheduler::elapsed_ms;

const MINUTE_MS: u32 = 60_000;

const WARM_UP_C: u8 = 60;
const SOAK_C: u8 = 65;
const SOAK_HYSTERESIS_C: u8 = 5;
const SOAK_MS: u32 = 45 * MINUTE_MS;
const HEAT_C: u8 = 95;
const HEAT_HYSTERESIS_C: u8 = 2;
const HEAT_TIMEOUT_MS: u32 = 30 * MINUTE_MS;
const COOK_HYSTERESIS_C: u8 = 1;
const VAPOR_END_C: u8 = 120;
/// Lid temperatures above this are steam and tell nothing new
const VAPOR_CEILING_C: u8 = 100;
const REST_C: u8 = 65;
const REST_HYSTERESIS_C: u8 = 4;
const REST_MS: u32 = 10 * MINUTE_MS;
const KEEP_WARM_C: u8 = 65;
const KEEP_WARM_HYSTERESIS_C: u8 = 2;

pub const DEFAULT_COOKING_TEMP_C: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RiceStage {
    Waiting,
    Start,
    Soak,
    Heat,
    Cook,
    Vapor,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RiceProgram {
    cooking_time_min: u8,
    cooking_temp_c: u8,
    fast: bool,
    stage: RiceStage,
    stage_started_ms: u32,
    vapor_max_c: u8,
}

impl RiceProgram {
    /// Standard rice with the given total cooking time
    pub fn new(cooking_time_min: u8) -> Self {
        Self {
            cooking_time_min,
            cooking_temp_c: DEFAULT_COOKING_TEMP_C,
            fast: false,
            stage: RiceStage::Waiting,
            stage_started_ms: 0,
            vapor_max_c: 0,
        }
    }

    /// Override the cooking temperature
    pub fn with_temperature(mut self, cooking_temp_c: u8) -> Self {
        self.cooking_temp_c = cooking_temp_c;
        self
    }

    /// Skip the soak stage
    pub fn fast(mut self) -> Self {
        self.fast = true;
        self
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    pub fn stage(&self) -> RiceStage {
        self.stage
    }

    pub fn start(&mut self, now_ms: u32) {
        self.vapor_max_c = 0;
        self.set_stage(RiceStage::Start, now_ms);
    }

    pub fn cancel(&mut self, now_ms: u32) {
        self.set_stage(RiceStage::Waiting, now_ms);
    }

    fn set_stage(&mut self, stage: RiceStage, now_ms: u32) {
        debug!("Rice: {} -> {}", self.stage, stage);
        self.stage = stage;
        self.stage_started_ms = now_ms;
    }

    /// Estimated minutes left, `None` while waiting
    ///
    /// Sums the nominal length of the current and all later stages, minus
    /// the time already spent in the current one. Start and Heat depend on
    /// the pot, so they count as a flat guess.
    pub fn remaining_time_min(&self, now_ms: u32) -> Option<u32> {
        let half = self.cooking_time_min as u32 / 2;
        let soak = if self.fast { 0 } else { SOAK_MS / MINUTE_MS };
        // Fast rice starts heating from a cooler pot
        let heat = if self.fast { 4 } else { 2 };
        let rest = if self.fast { 0 } else { REST_MS / MINUTE_MS };

        let from_rest = rest;
        let from_vapor = from_rest + half;
        let from_cook = from_vapor + half;
        let from_heat = from_cook + heat;
        let from_soak = from_heat + soak;
        let from_start = from_soak + 2;

        let total = match self.stage {
            RiceStage::Waiting => return None,
            RiceStage::Start => from_start,
            RiceStage::Soak => from_soak,
            RiceStage::Heat => from_heat,
            RiceStage::Cook => from_cook,
            RiceStage::Vapor => from_vapor,
            RiceStage::Rest => from_rest,
        };
        let spent = elapsed_ms(now_ms, self.stage_started_ms) / MINUTE_MS;
        Some(total.saturating_sub(spent))
    }

    /// Cook and Vapor each take half the cooking time
    fn half_time_ms(&self) -> u32 {
        self.cooking_time_min as u32 * MINUTE_MS / 2
    }

    /// Linear ramp from the cooking temperature to 120 °C over the vapor stage
    fn vapor_target_c(&self, elapsed: u32) -> u8 {
        let half = self.half_time_ms();
        if half == 0 || self.cooking_temp_c >= VAPOR_END_C {
            return VAPOR_END_C.max(self.cooking_temp_c);
        }
        let span = (VAPOR_END_C - self.cooking_temp_c) as u64;
        let rise = (span * elapsed.min(half) as u64 / half as u64) as u8;
        self.cooking_temp_c + rise
    }

    pub(crate) fn step(&mut self, now_ms: u32, heater: &mut PowerModulator) -> StepOutcome {
        let top = heater.top_temperature();
        let bottom = heater.bottom_temperature();
        let elapsed = elapsed_ms(now_ms, self.stage_started_ms);

        match self.stage {
            RiceStage::Waiting => {
                heater.clear_target();
                heater.power_off();
            }
            RiceStage::Start => {
                heater.set_target(WARM_UP_C, 0);
                if bottom >= WARM_UP_C {
                    self.set_stage(RiceStage::Soak, now_ms);
                }
            }
            RiceStage::Soak => {
                heater.set_target(SOAK_C, SOAK_HYSTERESIS_C);
                if elapsed > SOAK_MS || self.fast {
                    self.set_stage(RiceStage::Heat, now_ms);
                }
            }
            RiceStage::Heat => {
                heater.set_target(HEAT_C, HEAT_HYSTERESIS_C);
                if bottom >= HEAT_C {
                    self.set_stage(RiceStage::Cook, now_ms);
                } else if elapsed > HEAT_TIMEOUT_MS {
                    warn!("Rice: heating took over 30 min, aborting");
                    heater.power_off();
                    return StepOutcome::Abort;
                }
            }
            RiceStage::Cook => {
                self.vapor_max_c = top.max(self.vapor_max_c).min(VAPOR_CEILING_C);
                if top < self.vapor_max_c {
                    heater.power_on();
                }
                heater.set_target(self.cooking_temp_c, COOK_HYSTERESIS_C);

                if elapsed > self.half_time_ms() {
                    heater.power_on();
                    self.set_stage(RiceStage::Vapor, now_ms);
                }
            }
            RiceStage::Vapor => {
                let target = self.vapor_target_c(elapsed);
                heater.set_target(target, 0);

                if elapsed > self.half_time_ms() {
                    heater.power_off();
                    self.set_stage(RiceStage::Rest, now_ms);
                }
            }
            RiceStage::Rest => {
                heater.set_target(REST_C, REST_HYSTERESIS_C);

                if self.fast || elapsed > REST_MS {
                    heater.power_off();
                    info!("Rice: done, keeping warm");
                    return StepOutcome::Handover(Program::KeepWarm(KeepWarm::started(
                        KEEP_WARM_C,
                        KEEP_WARM_HYSTERESIS_C,
                    )));
                }
            }
        }

        trace!(
            "Rice: {} top {} C, bottom {} C",
            self.stage,
            top,
            bottom
        );
        StepOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heater::HeatBand;

    fn step_at(program: &mut RiceProgram, heater: &mut PowerModulator, now: u32, bottom: u8) -> StepOutcome {
        heater.update(bottom, bottom);
        program.step(now, heater)
    }

    #[test]
    fn test_waiting_keeps_heater_off() {
        let mut program = RiceProgram::new(40);
        let mut heater = PowerModulator::new();
        heater.power_on();

        assert_eq!(step_at(&mut program, &mut heater, 0, 20), StepOutcome::Continue);
        assert!(!heater.is_on());
        assert_eq!(heater.band(), None);
    }

    #[test]
    fn test_full_cycle() {
        let mut program = RiceProgram::new(40);
        let mut heater = PowerModulator::new();
        program.start(0);
        assert_eq!(program.stage(), RiceStage::Start);

        step_at(&mut program, &mut heater, 1_000, 30);
        assert_eq!(program.stage(), RiceStage::Start);
        assert_eq!(heater.band(), Some(HeatBand::around(60, 0)));

        step_at(&mut program, &mut heater, 2_000, 60);
        assert_eq!(program.stage(), RiceStage::Soak);

        step_at(&mut program, &mut heater, 2_000 + SOAK_MS, 65);
        assert_eq!(program.stage(), RiceStage::Soak);
        step_at(&mut program, &mut heater, 2_001 + SOAK_MS, 65);
        assert_eq!(program.stage(), RiceStage::Heat);

        let heat_start = 2_001 + SOAK_MS;
        step_at(&mut program, &mut heater, heat_start + 60_000, 95);
        assert_eq!(program.stage(), RiceStage::Cook);

        // 40 min cooking: 20 min cook, 20 min vapor
        let cook_start = heat_start + 60_000;
        step_at(&mut program, &mut heater, cook_start + 20 * MINUTE_MS + 1, 100);
        assert_eq!(program.stage(), RiceStage::Vapor);
        assert!(heater.is_on());

        let vapor_start = cook_start + 20 * MINUTE_MS + 1;
        step_at(&mut program, &mut heater, vapor_start + 10 * MINUTE_MS, 105);
        assert_eq!(heater.band(), Some(HeatBand::around(110, 0)));

        let rest_start = vapor_start + 20 * MINUTE_MS + 1;
        let outcome = step_at(&mut program, &mut heater, rest_start, 118);
        assert_eq!(outcome, StepOutcome::Continue);
        assert_eq!(program.stage(), RiceStage::Rest);
        assert!(!heater.is_on());

        step_at(&mut program, &mut heater, rest_start + REST_MS, 70);
        assert_eq!(program.stage(), RiceStage::Rest);
        assert_eq!(heater.band(), Some(HeatBand::around(65, 4)));

        let outcome = step_at(&mut program, &mut heater, rest_start + REST_MS + 1, 68);
        assert_eq!(
            outcome,
            StepOutcome::Handover(Program::KeepWarm(KeepWarm::started(65, 2)))
        );
        assert!(!heater.is_on());
    }

    #[test]
    fn test_fast_skips_soak() {
        let mut program = RiceProgram::new(40).fast();
        let mut heater = PowerModulator::new();
        program.start(0);

        step_at(&mut program, &mut heater, 500, 60);
        assert_eq!(program.stage(), RiceStage::Soak);
        step_at(&mut program, &mut heater, 1_000, 62);
        assert_eq!(program.stage(), RiceStage::Heat);
    }

    #[test]
    fn test_fast_rest_is_one_step() {
        let mut program = RiceProgram::new(2).fast();
        let mut heater = PowerModulator::new();
        program.start(0);
        step_at(&mut program, &mut heater, 0, 60);
        step_at(&mut program, &mut heater, 0, 60);
        step_at(&mut program, &mut heater, 0, 95);
        assert_eq!(program.stage(), RiceStage::Cook);

        // 2 min cooking: 1 min cook, 1 min vapor
        step_at(&mut program, &mut heater, MINUTE_MS + 1, 100);
        assert_eq!(program.stage(), RiceStage::Vapor);
        step_at(&mut program, &mut heater, 2 * MINUTE_MS + 2, 115);
        assert_eq!(program.stage(), RiceStage::Rest);

        let outcome = step_at(&mut program, &mut heater, 2 * MINUTE_MS + 3, 110);
        assert_eq!(
            outcome,
            StepOutcome::Handover(Program::KeepWarm(KeepWarm::started(65, 2)))
        );
    }

    #[test]
    fn test_remaining_time() {
        let mut program = RiceProgram::new(40);
        assert_eq!(program.remaining_time_min(0), None);

        program.start(0);
        // 2 start + 45 soak + 2 heat + 20 cook + 20 vapor + 10 rest
        assert_eq!(program.remaining_time_min(0), Some(99));
        assert_eq!(program.remaining_time_min(5 * MINUTE_MS + 30_000), Some(94));

        let mut fast = RiceProgram::new(40).fast();
        fast.start(0);
        // 2 start + 4 heat + 20 cook + 20 vapor
        assert_eq!(fast.remaining_time_min(0), Some(46));
    }

    #[test]
    fn test_remaining_time_follows_stage() {
        let mut program = RiceProgram::new(40);
        let mut heater = PowerModulator::new();
        program.start(0);
        step_at(&mut program, &mut heater, 1_000, 60);
        assert_eq!(program.stage(), RiceStage::Soak);
        assert_eq!(program.remaining_time_min(1_000), Some(97));

        // Overrunning a stage never goes below zero
        assert_eq!(program.remaining_time_min(1_000 + 200 * MINUTE_MS), Some(0));
    }

    #[test]
    fn test_heat_timeout_aborts() {
        let mut program = RiceProgram::new(40).fast();
        let mut heater = PowerModulator::new();
        program.start(0);
        step_at(&mut program, &mut heater, 0, 60);
        step_at(&mut program, &mut heater, 0, 60);
        assert_eq!(program.stage(), RiceStage::Heat);

        assert_eq!(
            step_at(&mut program, &mut heater, HEAT_TIMEOUT_MS, 80),
            StepOutcome::Continue
        );
        assert_eq!(
            step_at(&mut program, &mut heater, HEAT_TIMEOUT_MS + 1, 80),
            StepOutcome::Abort
        );
        assert!(!heater.is_on());
    }

    #[test]
    fn test_cook_reheats_when_lid_cools() {
        let mut program = RiceProgram::new(40).with_temperature(98);
        let mut heater = PowerModulator::new();
        program.start(0);
        step_at(&mut program, &mut heater, 0, 60);
        step_at(&mut program, &mut heater, SOAK_MS + 1, 65);
        step_at(&mut program, &mut heater, SOAK_MS + 2, 95);
        assert_eq!(program.stage(), RiceStage::Cook);

        heater.power_off();
        heater.update(99, 97);
        program.step(SOAK_MS + 3, &mut heater);
        assert!(!heater.is_on());

        heater.update(90, 97);
        program.step(SOAK_MS + 4, &mut heater);
        assert!(heater.is_on());
        assert_eq!(heater.band(), Some(HeatBand::around(98, 1)));
    }

    #[test]
    fn test_restart_after_cancel() {
        let mut program = RiceProgram::new(40);
        let mut heater = PowerModulator::new();
        program.start(0);
        step_at(&mut program, &mut heater, 0, 60);
        assert_eq!(program.stage(), RiceStage::Soak);

        program.cancel(10);
        assert_eq!(program.stage(), RiceStage::Waiting);
        program.start(20);
        assert_eq!(program.stage(), RiceStage::Start);
    }

    #[test]
    fn test_vapor_ramp_bounds() {
        let program = RiceProgram::new(40);
        assert_eq!(program.vapor_target_c(0), 100);
        assert_eq!(program.vapor_target_c(u32::MAX), 120);
        assert_eq!(RiceProgram::new(0).vapor_target_c(0), 120);
    }
}
