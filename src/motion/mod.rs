//! Motion control core.
//!
//! Provides the coordinated move controller, idler engagement control, the
//! filament transport loops, and the owned motion state they share.

mod controller;
mod state;
mod transport;

pub use controller::{MotionController, MotionControllerBuilder};
pub use state::MotionState;
pub use transport::DOOR_OPEN_SENTINEL;
