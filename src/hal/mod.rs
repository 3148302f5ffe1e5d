//! Hardware seams consumed by the motion core.
//!
//! Everything the core touches outside its own state goes through the traits
//! in this module: the step engine, the stepper driver chip, the command
//! channel, the microsecond clock, and fault presentation. Timing and the
//! filament presence sensor use `embedded-hal` directly (`DelayNs`,
//! `InputPin`).

mod driver;
mod engine;
mod io;

pub use driver::{Axis, StepperDriver, StepperMode};
pub use engine::StepEngine;
pub use io::{CommandStream, FaultSignaler, MicrosClock};
