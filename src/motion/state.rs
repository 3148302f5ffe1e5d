//! Motion state tracking.
//!
//! One owned state object holds everything the controller remembers between
//! operations: the last commanded slot per axis, whether the selector has
//! homed since power-on, whether the idler is engaged, and the door-sensor
//! latch. Single writer, no ambient globals.

use crate::config::units::Slot;

/// Position, homing and engagement state of the selector mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionState {
    /// Last commanded idler slot.
    idler: Slot,
    /// Last commanded selector slot.
    selector: Slot,
    /// Whether the selector has completed its first homing since power-on.
    selector_homed: bool,
    /// Whether the idler is pressed against the active carrier.
    idler_engaged: bool,
    /// Latched once a door-open signal has ever been observed.
    door_sensor_seen: bool,
}

impl MotionState {
    /// State at power-on: positions unknown (slot 0 placeholders), selector
    /// unhomed, idler mechanically engaged, no door sensor observed.
    pub fn new() -> Self {
        Self {
            idler: Slot::HOME,
            selector: Slot::HOME,
            selector_homed: false,
            idler_engaged: true,
            door_sensor_seen: false,
        }
    }

    /// Last commanded idler slot.
    #[inline]
    pub fn idler(&self) -> Slot {
        self.idler
    }

    /// Last commanded selector slot.
    #[inline]
    pub fn selector(&self) -> Slot {
        self.selector
    }

    /// Whether the selector has homed since power-on.
    #[inline]
    pub fn is_homed(&self) -> bool {
        self.selector_homed
    }

    /// Whether the idler is engaged.
    #[inline]
    pub fn idler_engaged(&self) -> bool {
        self.idler_engaged
    }

    /// Whether a door-open signal has ever been observed.
    #[inline]
    pub fn door_sensor_seen(&self) -> bool {
        self.door_sensor_seen
    }

    /// Record the commanded slot for both axes.
    #[inline]
    pub fn set_positions(&mut self, idler: Slot, selector: Slot) {
        self.idler = idler;
        self.selector = selector;
    }

    /// Record the commanded idler slot, leaving the selector untouched.
    #[inline]
    pub fn set_idler(&mut self, idler: Slot) {
        self.idler = idler;
    }

    /// Mark the first full home complete. Resets both positions to the home
    /// slot. One-way: nothing clears this flag short of a power cycle.
    pub fn mark_homed(&mut self) {
        self.idler = Slot::HOME;
        self.selector = Slot::HOME;
        self.selector_homed = true;
    }

    /// Reset both positions to the home slot without touching the homed flag.
    ///
    /// Used by destructive recovery, which physically re-homes regardless of
    /// the power-on flag.
    pub fn reset_positions(&mut self) {
        self.idler = Slot::HOME;
        self.selector = Slot::HOME;
    }

    /// Record the idler engagement state.
    #[inline]
    pub fn set_idler_engaged(&mut self, engaged: bool) {
        self.idler_engaged = engaged;
    }

    /// Latch the door-sensor flag. Monotonic: there is no way to clear it.
    #[inline]
    pub fn latch_door_sensor(&mut self) {
        self.door_sensor_seen = true;
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_state() {
        let state = MotionState::new();

        assert!(!state.is_homed());
        assert!(state.idler_engaged());
        assert!(!state.door_sensor_seen());
        assert_eq!(state.idler(), Slot::HOME);
        assert_eq!(state.selector(), Slot::HOME);
    }

    #[test]
    fn test_mark_homed_resets_positions() {
        let mut state = MotionState::new();
        state.set_positions(Slot(3), Slot(4));

        state.mark_homed();

        assert!(state.is_homed());
        assert_eq!(state.idler(), Slot::HOME);
        assert_eq!(state.selector(), Slot::HOME);
    }

    #[test]
    fn test_reset_positions_keeps_homed_flag() {
        let mut state = MotionState::new();
        state.mark_homed();
        state.set_positions(Slot(2), Slot(2));

        state.reset_positions();

        assert!(state.is_homed());
        assert_eq!(state.selector(), Slot::HOME);
    }

    #[test]
    fn test_door_latch_is_monotonic() {
        let mut state = MotionState::new();

        state.latch_door_sensor();
        assert!(state.door_sensor_seen());

        // No API exists to clear it; latching again is a no-op.
        state.latch_door_sensor();
        assert!(state.door_sensor_seen());
    }
}
