//! Step engine seam.
//!
//! The step engine owns pulse generation, axis homing, and the mapping from
//! logical slot indices to physical step counts. This crate only issues
//! commands through it.

use crate::config::units::{Slot, Steps};

/// Low-level step generation and homing for the three selector axes.
///
/// Implementations are expected to block until the commanded motion has been
/// pulsed out; the motion core sequences everything on a single thread.
///
/// The step mappings must be consistent: repeated calls with the same
/// `(from, to)` pair return the same count, and the count commanded by
/// [`move_proportional`](StepEngine::move_proportional) physically lands the
/// axis on `to`. The mapping is otherwise a black box (it need not be linear
/// in the slot index).
pub trait StepEngine {
    /// Home both the idler and the selector axis.
    fn home(&mut self);

    /// Home only the idler axis.
    fn home_idler(&mut self);

    /// Move both axes concurrently by the given step counts, interpolating
    /// so that they finish together.
    fn move_proportional(&mut self, idler_steps: Steps, selector_steps: Steps);

    /// Step count to move the idler between two slots.
    fn idler_steps(&self, from: Slot, to: Slot) -> Steps;

    /// Step count to move the selector between two slots.
    fn selector_steps(&self, from: Slot, to: Slot) -> Steps;

    /// Issue a single pulley step pulse.
    fn step_pulley(&mut self);

    /// Set the pulley direction to push filament toward the extruder.
    fn set_pulley_dir_push(&mut self);

    /// Set the pulley direction to pull filament back toward the selector.
    fn set_pulley_dir_pull(&mut self);

    /// Press the idler against the active carrier (`engage = true`) or
    /// retract it to the parked offset (`engage = false`).
    fn park_idler(&mut self, engage: bool);
}
