//! Stepper driver chip seam.
//!
//! Covers per-axis current/chopper initialization, the coarse global fault
//! flag, and the enable lines. Register-level protocol stays on the other
//! side of this trait.

use serde::Deserialize;

use crate::error::DriveError;

/// One of the three controlled axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Drives filament linearly through the Bowden tube.
    Pulley,
    /// Picks the active filament channel.
    Selector,
    /// Presses the chosen filament against the drive wheel.
    Idler,
}

/// Driver current/chopper mode profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepperMode {
    /// Full-current spread-cycle operation.
    #[default]
    Normal,
    /// Reduced-noise stealth operation.
    Stealth,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StepperMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StepperMode::Normal => defmt::write!(fmt, "normal"),
            StepperMode::Stealth => defmt::write!(fmt, "stealth"),
        }
    }
}

/// Stepper driver chip control.
///
/// The fault model is deliberately coarse: a single flag that covers every
/// axis, cleared implicitly by [`init`](StepperDriver::init). Recovery
/// ordering matters - outputs must be disabled, allowed to settle, re-enabled
/// and re-initialized before any further home or step command, or the axis
/// behaves unpredictably.
pub trait StepperDriver {
    /// Initialize current and chopper registers on every axis for the given
    /// mode profile. Clears the global fault flag.
    fn init(&mut self, mode: StepperMode) -> Result<(), DriveError>;

    /// Cut power to a single axis.
    fn disable_axis(&mut self, axis: Axis, mode: StepperMode);

    /// Read the global fault flag. `true` means some axis reported a fault
    /// since the last initialization.
    fn read_global_fault(&mut self) -> bool;

    /// Assert the enable line for all axes.
    fn enable_all(&mut self);

    /// Release the enable line for all axes.
    fn disable_all(&mut self);
}
