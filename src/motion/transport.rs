//! Filament transport loops.
//!
//! The two timing-critical, sensor-gated loops that physically move filament
//! along the Bowden tube: unload back to the presence sensor and feed forward
//! into the extruder gears. Both pace individual pulley steps with a
//! busy-wait period recomputed every step from a piecewise ramp.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::error::{Error, Result, TransportError};
use crate::hal::{Axis, CommandStream, FaultSignaler, MicrosClock, StepEngine, StepperDriver, StepperMode};

use super::controller::{Attempt, MotionController};

/// In-band byte on the command channel announcing the enclosure door opened.
pub const DOOR_OPEN_SENTINEL: u8 = b'A';

/// Consecutive filament-absent reads required to accept the unload as done.
const FINDA_DEBOUNCE_READS: u8 = 50;

/// Unload starts at this step period (µs). Larger period = slower.
const UNLOAD_INITIAL_PERIOD_US: i32 = 4000;

/// Feed starts at this step period (µs), persisting across feed retries.
const FEED_INITIAL_PERIOD_US: i32 = 4500;

/// Seed value for the compensated per-step wait at the start of a feed pass.
const FEED_SEED_WAIT_US: u32 = 9000;

/// The feed ramps its period down over this many leading steps.
const FEED_RAMP_STEPS: u16 = 2000;

/// The feed ramps its period back up over this many trailing steps.
const FEED_TAIL_STEPS: u16 = 400;

/// The unload switches from cruising to its mid-travel acceleration window
/// this many steps into the travel.
const UNLOAD_ACCEL_START_OFFSET: i32 = 650;

/// Step period after one unload step, as a piecewise function of the steps
/// remaining in the budget.
///
/// Three windows, applied in order against the same period:
/// - final 700 steps: slow down by 3 µs/step up to 12000 µs
/// - final 900 steps: slow down by a further 2 µs/step up to 5000 µs
/// - between `accel_start` and 2500 remaining: speed up by 2 µs/step down to
///   1100 µs, plus another 2 down to 500 µs when the driver runs the normal
///   current profile
fn unload_period_after_step(
    mut period_us: i32,
    remaining: i32,
    accel_start: i32,
    mode: StepperMode,
) -> i32 {
    if remaining < 700 && period_us < 12000 {
        period_us += 3;
    }
    if remaining < 900 && period_us < 5000 {
        period_us += 2;
    }
    if remaining < accel_start && remaining > 2500 {
        if period_us > 1100 {
            period_us -= 2;
        }
        if period_us > 500 && mode == StepperMode::Normal {
            period_us -= 2;
        }
    }
    period_us
}

/// Step period after one feed step, as a piecewise function of the step
/// index.
///
/// Over the first [`FEED_RAMP_STEPS`] steps the period drops through four
/// stacked thresholds; the last term only applies in normal current mode
/// after a door-open signal has ever been seen. Over the final
/// [`FEED_TAIL_STEPS`] steps the period climbs back toward 5200 µs. The tail
/// comparison uses wrapping arithmetic so budgets shorter than the tail never
/// enter it.
fn feed_period_after_step(
    mut period_us: i32,
    index: u16,
    budget: u16,
    mode: StepperMode,
    door_seen: bool,
) -> i32 {
    if index < FEED_RAMP_STEPS {
        if period_us > 5200 {
            period_us -= 4;
        }
        if period_us > 2600 {
            period_us -= 2;
        }
        if period_us > 1300 {
            period_us -= 1;
        }
        if period_us > 700 && mode == StepperMode::Normal && door_seen {
            period_us -= 1;
        }
    }
    if index > budget.wrapping_sub(FEED_TAIL_STEPS) && period_us < 5200 {
        period_us += 10;
    }
    period_us
}

impl<ENG, DRV, FINDA, COM, CLK, DELAY, SIG> MotionController<ENG, DRV, FINDA, COM, CLK, DELAY, SIG>
where
    ENG: StepEngine,
    DRV: StepperDriver,
    FINDA: InputPin,
    COM: CommandStream,
    CLK: MicrosClock,
    DELAY: DelayNs,
    SIG: FaultSignaler,
{
    /// Pull filament back until the presence sensor confirms it is gone.
    ///
    /// Runs the unload sweep with the standard three-attempt budget. The
    /// retry predicate is a conjunction: only a drive fault *with the sensor
    /// still reading present* counts as a failed attempt. An unload that
    /// cleared the sensor is accepted even if the driver flags a fault.
    pub fn unload_to_finda(&mut self) -> Result<()> {
        self.with_drive_recovery(
            |c| {
                c.unload_sweep()?;
                Ok(Attempt::Completed)
            },
            |c| Ok(c.driver.read_global_fault() && c.finda_present()?),
            Self::rehome_idler,
        )
    }

    /// Push filament forward until the extruder gears can grip it.
    ///
    /// Steps a fixed budget of half the Bowden length with per-step drift
    /// compensation, polling the command channel each step for the door-open
    /// sentinel. A sentinel aborts the feed - pulley disabled, idler
    /// disengaged - and counts as success. A drive fault after a completed
    /// pass retries through idler re-home plus an unload back to the sensor,
    /// up to three attempts.
    ///
    /// The ramp period carries over between retry attempts; the step budget
    /// does not shrink.
    pub fn feed_to_bondtech(&mut self) -> Result<()> {
        let mut period_us: i32 = FEED_INITIAL_PERIOD_US;
        let budget = self.transport.feed_steps();

        self.with_drive_recovery(
            |c| c.feed_sweep(&mut period_us, budget),
            |c| Ok(c.driver.read_global_fault()),
            |c| {
                c.rehome_idler()?;
                c.unload_sweep()
            },
        )
    }

    /// One unload pass: pull filament until the sensor has read absent for
    /// [`FINDA_DEBOUNCE_READS`] polls in total or the step budget runs out.
    ///
    /// The debounce count is cumulative: a filament-present read in the
    /// middle neither resets nor decays it.
    pub(crate) fn unload_sweep(&mut self) -> Result<()> {
        let mut period_us = UNLOAD_INITIAL_PERIOD_US;
        let mut absent_reads: u8 = 0;
        let mut remaining = self.transport.unload_steps();
        let accel_start = remaining - UNLOAD_ACCEL_START_OFFSET;

        self.engine.set_pulley_dir_pull();

        while absent_reads < FINDA_DEBOUNCE_READS && remaining > 0 {
            self.engine.step_pulley();
            remaining -= 1;

            period_us = unload_period_after_step(period_us, remaining, accel_start, self.mode);

            self.delay.delay_us(period_us as u32);
            if self
                .finda
                .is_low()
                .map_err(|_| Error::Transport(TransportError::SensorRead))?
            {
                absent_reads += 1;
            }
        }

        Ok(())
    }

    /// One feed pass over `budget` steps.
    ///
    /// Each iteration busy-waits the compensated period, updates the ramp,
    /// polls for the door sentinel, then pulses the pulley. The next wait is
    /// the target period minus the time this iteration already consumed, so
    /// instruction overhead never accumulates into drift.
    fn feed_sweep(&mut self, period_us: &mut i32, budget: u16) -> Result<Attempt> {
        self.engine.set_pulley_dir_push();
        let mut wait_us: u32 = FEED_SEED_WAIT_US;

        for index in 0..budget {
            self.delay.delay_us(wait_us);
            let step_start = self.clock.micros();

            *period_us = feed_period_after_step(
                *period_us,
                index,
                budget,
                self.mode,
                self.state.door_sensor_seen(),
            );

            if self.com.poll() == Some(DOOR_OPEN_SENTINEL) {
                #[cfg(feature = "defmt")]
                defmt::info!("feed aborted by door sensor");
                self.state.latch_door_sensor();
                self.driver.disable_axis(Axis::Pulley, self.mode);
                self.disengage_idler()?;
                return Ok(Attempt::Aborted);
            }

            self.engine.step_pulley();
            let elapsed = self.clock.micros().wrapping_sub(step_start);
            wait_us = (*period_us as u32).wrapping_sub(elapsed);
        }

        Ok(Attempt::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unload_slowdown_stops_at_first_window_boundary() {
        // Exactly 900 remaining: the 2 µs/step term no longer applies.
        let at_boundary = unload_period_after_step(4000, 900, 3900, StepperMode::Stealth);
        assert_eq!(at_boundary, 4000);

        let inside = unload_period_after_step(4000, 899, 3900, StepperMode::Stealth);
        assert_eq!(inside, 4002);
    }

    #[test]
    fn test_unload_final_window_stacks_with_early_window() {
        // Under 700 remaining both slowdown terms apply.
        let period = unload_period_after_step(4000, 699, 3900, StepperMode::Stealth);
        assert_eq!(period, 4005);
    }

    #[test]
    fn test_unload_slowdown_caps() {
        // Both slowdown terms stop at their period ceilings.
        assert_eq!(
            unload_period_after_step(12000, 500, 3900, StepperMode::Stealth),
            12000
        );
        assert_eq!(
            unload_period_after_step(5000, 800, 3900, StepperMode::Stealth),
            5000
        );
    }

    #[test]
    fn test_unload_accel_window_mode_dependent() {
        // Mid-travel window: stealth sheds 2 µs, normal sheds 4 µs.
        let stealth = unload_period_after_step(4000, 3000, 3900, StepperMode::Stealth);
        assert_eq!(stealth, 3998);

        let normal = unload_period_after_step(4000, 3000, 3900, StepperMode::Normal);
        assert_eq!(normal, 3996);
    }

    #[test]
    fn test_unload_accel_window_closed_outside_bounds() {
        // At the window edges nothing accelerates.
        assert_eq!(
            unload_period_after_step(4000, 3900, 3900, StepperMode::Normal),
            4000
        );
        assert_eq!(
            unload_period_after_step(4000, 2500, 3900, StepperMode::Normal),
            4000
        );
    }

    #[test]
    fn test_feed_ramp_stops_at_index_2000() {
        let at_boundary = feed_period_after_step(4500, 2000, 8000, StepperMode::Stealth, false);
        assert_eq!(at_boundary, 4500);

        let inside = feed_period_after_step(4500, 1999, 8000, StepperMode::Stealth, false);
        assert_eq!(inside, 4497);
    }

    #[test]
    fn test_feed_ramp_thresholds_stack() {
        // Above every threshold all four terms apply in normal mode with the
        // door latch set.
        let period = feed_period_after_step(6000, 0, 8000, StepperMode::Normal, true);
        assert_eq!(period, 6000 - 4 - 2 - 1 - 1);

        // The door term needs both normal mode and the latch.
        let no_door = feed_period_after_step(6000, 0, 8000, StepperMode::Normal, false);
        assert_eq!(no_door, 6000 - 4 - 2 - 1);

        let stealth = feed_period_after_step(6000, 0, 8000, StepperMode::Stealth, true);
        assert_eq!(stealth, 6000 - 4 - 2 - 1);
    }

    #[test]
    fn test_feed_tail_ramps_back_up() {
        let period = feed_period_after_step(1400, 7601, 8000, StepperMode::Stealth, false);
        assert_eq!(period, 1410);

        // At the tail boundary itself the term does not yet apply.
        let at_boundary = feed_period_after_step(1400, 7600, 8000, StepperMode::Stealth, false);
        assert_eq!(at_boundary, 1400);
    }

    #[test]
    fn test_feed_tail_skipped_for_short_budgets() {
        // Budgets under the tail length wrap the subtraction and never enter
        // the tail ramp.
        let period = feed_period_after_step(1400, 200, 300, StepperMode::Stealth, false);
        assert_eq!(period, 1400);
    }
}
