//! Motion controller.
//!
//! Owns the motion state and sequences every axis operation through the
//! hardware seams, recovering from stepper drive faults with a bounded
//! re-home-and-retry budget.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::units::{Slot, Steps};
use crate::config::{SystemConfig, TransportConfig};
use crate::error::{ConfigError, DriveError, Error, Result, TransportError};
use crate::hal::{CommandStream, FaultSignaler, MicrosClock, StepEngine, StepperDriver, StepperMode};

use super::state::MotionState;

/// Recovery attempts after the initial try. Three attempts total.
const DRIVE_RETRIES: u8 = 2;

/// Settle time between cutting and restoring driver power during recovery.
const SETTLE_DELAY_MS: u32 = 10;

/// How a single recovery-loop attempt ended.
pub(crate) enum Attempt {
    /// The attempt body ran to completion; the fault flag decides what's next.
    Completed,
    /// The attempt terminated itself on purpose; skip the fault check and
    /// report success.
    Aborted,
}

/// Coordinated motion and recovery controller for the selector mechanism.
///
/// Generic over the hardware seams:
/// - `ENG`: step engine (homing, proportional moves, pulley stepping)
/// - `DRV`: stepper driver chip (init, enable lines, global fault flag)
/// - `FINDA`: filament presence sensor line (high = filament present)
/// - `COM`: non-blocking command channel (door-open sentinel during feed)
/// - `CLK`: free-running microsecond clock (step drift compensation)
/// - `DELAY`: busy-wait delay provider
/// - `SIG`: fault presentation collaborator
pub struct MotionController<ENG, DRV, FINDA, COM, CLK, DELAY, SIG>
where
    ENG: StepEngine,
    DRV: StepperDriver,
    FINDA: InputPin,
    COM: CommandStream,
    CLK: MicrosClock,
    DELAY: DelayNs,
    SIG: FaultSignaler,
{
    pub(crate) engine: ENG,
    pub(crate) driver: DRV,
    pub(crate) finda: FINDA,
    pub(crate) com: COM,
    pub(crate) clock: CLK,
    pub(crate) delay: DELAY,
    pub(crate) signaler: SIG,

    /// Active driver mode profile, used for re-initialization and the
    /// mode-dependent ramp terms.
    pub(crate) mode: StepperMode,

    /// Transport travel configuration (Bowden length).
    pub(crate) transport: TransportConfig,

    /// Owned motion state.
    pub(crate) state: MotionState,
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
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        engine: ENG,
        driver: DRV,
        finda: FINDA,
        com: COM,
        clock: CLK,
        delay: DELAY,
        signaler: SIG,
        mode: StepperMode,
        transport: TransportConfig,
    ) -> Self {
        Self {
            engine,
            driver,
            finda,
            com,
            clock,
            delay,
            signaler,
            mode,
            transport,
            state: MotionState::new(),
        }
    }

    /// Start building a controller.
    pub fn builder() -> MotionControllerBuilder<ENG, DRV, FINDA, COM, CLK, DELAY, SIG> {
        MotionControllerBuilder::new()
    }

    /// Current motion state.
    #[inline]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Active driver mode profile.
    #[inline]
    pub fn mode(&self) -> StepperMode {
        self.mode
    }

    /// Transport travel configuration.
    #[inline]
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Position both axes at the same filament slot.
    ///
    /// Equivalent to [`set_idler_selector`](Self::set_idler_selector) with the
    /// slot repeated for both axes.
    pub fn select_slot(&mut self, slot: Slot) -> Result<()> {
        self.set_idler_selector(slot, slot)
    }

    /// Move the idler and selector to the given slots.
    ///
    /// The first call since power-on homes the whole system before honoring
    /// the target. On a drive fault the move is retried through a full
    /// re-home, up to three attempts; a fault that survives the budget is
    /// signalled once and returned as [`DriveError::Unrecoverable`].
    ///
    /// On success the stored positions equal the requested targets and the
    /// driver reports no fault.
    pub fn set_idler_selector(&mut self, idler: Slot, selector: Slot) -> Result<()> {
        if !self.state.is_homed() {
            #[cfg(feature = "defmt")]
            defmt::debug!("first selector home");
            self.engine.home();
            self.state.mark_homed();
        }

        self.with_drive_recovery(
            |c| {
                let idler_steps = c.engine.idler_steps(c.state.idler(), idler);
                let selector_steps = c.engine.selector_steps(c.state.selector(), selector);

                c.engine.move_proportional(idler_steps, selector_steps);
                // Recorded before the fault check: a retry re-homes and
                // re-issues the same logical target, with the delta computed
                // from the fresh origin.
                c.state.set_positions(idler, selector);
                Ok(Attempt::Completed)
            },
            |c| Ok(c.driver.read_global_fault()),
            Self::rehome,
        )
    }

    /// Press the idler against the active filament carrier.
    ///
    /// The park command is issued unconditionally - engaging twice issues it
    /// twice. Drive health is verified afterwards with the idler-only
    /// recovery loop.
    pub fn engage_idler(&mut self) -> Result<()> {
        self.state.set_idler_engaged(true);
        self.engine.park_idler(true);
        self.check_idler_drive_error()
    }

    /// Retract the idler to its parked offset.
    pub fn disengage_idler(&mut self) -> Result<()> {
        self.state.set_idler_engaged(false);
        self.engine.park_idler(false);
        self.check_idler_drive_error()
    }

    /// Home the idler axis and move it to the given slot, without touching
    /// the selector.
    ///
    /// Manual positioning path; carries no fault recovery loop.
    pub fn set_idler(&mut self, idler: Slot) {
        self.engine.home_idler();
        let idler_steps = self.engine.idler_steps(Slot::HOME, idler);
        self.engine.move_proportional(idler_steps, Steps(0));
        self.state.set_idler(idler);
    }

    /// Record that the enclosure door-open signal was observed out-of-band.
    ///
    /// The latch is monotonic; once set, feed ramps apply their extra
    /// deceleration term for the rest of the process lifetime.
    pub fn door_sensor_detected(&mut self) {
        self.state.latch_door_sensor();
    }

    /// Read the filament presence sensor (high = present).
    pub(crate) fn finda_present(&mut self) -> Result<bool> {
        self.finda
            .is_high()
            .map_err(|_| Error::Transport(TransportError::SensorRead))
    }

    /// Idler-only drive health check.
    ///
    /// Same budget and escalation as the coordinated move, scoped to the
    /// idler: a clean fault flag on the first check means zero recovery
    /// actions.
    pub(crate) fn check_idler_drive_error(&mut self) -> Result<()> {
        self.with_drive_recovery(
            |_| Ok(Attempt::Completed),
            |c| Ok(c.driver.read_global_fault()),
            Self::rehome_idler,
        )
    }

    /// Destructive full-system recovery.
    ///
    /// Stored positions are reset to the home slot first so that the caller's
    /// next step-delta computation is relative to the fresh origin. Power
    /// must be cycled and the chip re-initialized before homing, or the axis
    /// behaves unpredictably.
    pub(crate) fn rehome(&mut self) -> Result<()> {
        self.state.reset_positions();
        self.driver.disable_all();
        self.delay.delay_ms(SETTLE_DELAY_MS);
        self.driver.enable_all();
        self.driver.init(self.mode)?;
        self.engine.home();
        if self.state.idler_engaged() {
            self.engine.park_idler(true);
        }
        Ok(())
    }

    /// Idler-only recovery: re-home the axis, return it to the stored slot,
    /// and restore engagement. The stored idler position is the target here,
    /// not a casualty - it is left untouched.
    pub(crate) fn rehome_idler(&mut self) -> Result<()> {
        self.driver.disable_all();
        self.delay.delay_ms(SETTLE_DELAY_MS);
        self.driver.enable_all();
        self.driver.init(self.mode)?;
        self.engine.home_idler();
        let idler_steps = self.engine.idler_steps(Slot::HOME, self.state.idler());
        self.engine.move_proportional(idler_steps, Steps(0));
        if self.state.idler_engaged() {
            self.engine.park_idler(true);
        }
        Ok(())
    }

    /// Bounded retry-with-recovery loop shared by every fault-checked
    /// operation.
    ///
    /// Runs `attempt`, then consults `fault_present` (exactly one driver
    /// query per attempt). A clear flag - or an attempt that aborted itself -
    /// is success. A set flag on the final attempt signals the unrecoverable
    /// escalation once and returns the error without further recovery;
    /// otherwise the transient escalation fires, `recover` runs, and the
    /// attempt repeats.
    pub(crate) fn with_drive_recovery(
        &mut self,
        mut attempt: impl FnMut(&mut Self) -> Result<Attempt>,
        mut fault_present: impl FnMut(&mut Self) -> Result<bool>,
        mut recover: impl FnMut(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let mut attempt_index: u8 = 0;
        loop {
            if let Attempt::Aborted = attempt(self)? {
                return Ok(());
            }
            if !fault_present(self)? {
                return Ok(());
            }
            if attempt_index == DRIVE_RETRIES {
                #[cfg(feature = "defmt")]
                defmt::error!("drive fault persisted, giving up");
                self.signaler.unrecoverable_error();
                return Err(Error::Drive(DriveError::Unrecoverable));
            }
            #[cfg(feature = "defmt")]
            defmt::warn!("drive fault, recovering");
            self.signaler.drive_error();
            recover(self)?;
            attempt_index += 1;
        }
    }
}

/// Builder for creating [`MotionController`] instances.
pub struct MotionControllerBuilder<ENG, DRV, FINDA, COM, CLK, DELAY, SIG>
where
    ENG: StepEngine,
    DRV: StepperDriver,
    FINDA: InputPin,
    COM: CommandStream,
    CLK: MicrosClock,
    DELAY: DelayNs,
    SIG: FaultSignaler,
{
    engine: Option<ENG>,
    driver: Option<DRV>,
    finda: Option<FINDA>,
    com: Option<COM>,
    clock: Option<CLK>,
    delay: Option<DELAY>,
    signaler: Option<SIG>,
    mode: StepperMode,
    transport: Option<TransportConfig>,
}

impl<ENG, DRV, FINDA, COM, CLK, DELAY, SIG> Default
    for MotionControllerBuilder<ENG, DRV, FINDA, COM, CLK, DELAY, SIG>
where
    ENG: StepEngine,
    DRV: StepperDriver,
    FINDA: InputPin,
    COM: CommandStream,
    CLK: MicrosClock,
    DELAY: DelayNs,
    SIG: FaultSignaler,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ENG, DRV, FINDA, COM, CLK, DELAY, SIG>
    MotionControllerBuilder<ENG, DRV, FINDA, COM, CLK, DELAY, SIG>
where
    ENG: StepEngine,
    DRV: StepperDriver,
    FINDA: InputPin,
    COM: CommandStream,
    CLK: MicrosClock,
    DELAY: DelayNs,
    SIG: FaultSignaler,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            engine: None,
            driver: None,
            finda: None,
            com: None,
            clock: None,
            delay: None,
            signaler: None,
            mode: StepperMode::default(),
            transport: None,
        }
    }

    /// Set the step engine.
    pub fn step_engine(mut self, engine: ENG) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the stepper driver chip.
    pub fn driver(mut self, driver: DRV) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Set the filament presence sensor line (high = filament present).
    pub fn finda(mut self, finda: FINDA) -> Self {
        self.finda = Some(finda);
        self
    }

    /// Set the command channel polled for the door-open sentinel.
    pub fn command_stream(mut self, com: COM) -> Self {
        self.com = Some(com);
        self
    }

    /// Set the microsecond clock.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the fault presentation collaborator.
    pub fn fault_signaler(mut self, signaler: SIG) -> Self {
        self.signaler = Some(signaler);
        self
    }

    /// Set the driver mode profile directly.
    pub fn mode(mut self, mode: StepperMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the transport configuration directly.
    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Configure mode and transport travel from a [`SystemConfig`].
    pub fn from_config(mut self, config: &SystemConfig) -> Self {
        self.mode = config.driver.mode;
        self.transport = Some(config.transport.clone());
        self
    }

    /// Build the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if any component or the transport configuration is
    /// missing.
    pub fn build(self) -> Result<MotionController<ENG, DRV, FINDA, COM, CLK, DELAY, SIG>> {
        let engine = self
            .engine
            .ok_or(Error::Config(ConfigError::MissingComponent("step_engine")))?;
        let driver = self
            .driver
            .ok_or(Error::Config(ConfigError::MissingComponent("driver")))?;
        let finda = self
            .finda
            .ok_or(Error::Config(ConfigError::MissingComponent("finda")))?;
        let com = self
            .com
            .ok_or(Error::Config(ConfigError::MissingComponent("command_stream")))?;
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingComponent("clock")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingComponent("delay")))?;
        let signaler = self
            .signaler
            .ok_or(Error::Config(ConfigError::MissingComponent("fault_signaler")))?;
        let transport = self
            .transport
            .ok_or(Error::Config(ConfigError::MissingComponent("transport")))?;

        Ok(MotionController::new(
            engine, driver, finda, com, clock, delay, signaler, self.mode, transport,
        ))
    }
}
