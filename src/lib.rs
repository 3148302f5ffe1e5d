//! # selector-motion
//!
//! Fault-tolerant motion control core for multi-material filament selectors.
//!
//! A filament selector has three axes: a *selector* that picks the active
//! filament channel, an *idler* that presses the chosen filament against a
//! drive wheel, and a *pulley* that drives filament linearly through a Bowden
//! tube. This crate owns the coordinated motion and recovery logic for those
//! axes: position and homing state, bounded re-home-and-retry on stepper
//! driver faults, and the two sensor-gated transport loops that unload
//! filament back to the presence sensor (FINDA) and feed it forward into the
//! extruder's drive gears.
//!
//! ## Features
//!
//! - **Trait seams for hardware**: step generation, driver chip, sensors and
//!   timing are consumed through small traits, so the core runs unmodified on
//!   real hardware or scripted test doubles
//! - **embedded-hal 1.0**: `InputPin` for the filament sensor, `DelayNs` for
//!   step pacing
//! - **no_std compatible**: the core library works without the standard
//!   library
//! - **Bounded fault recovery**: every operation owns a three-attempt retry
//!   budget with driver re-initialization and re-homing between attempts
//! - **Configuration-driven**: Bowden tube length and driver current mode
//!   load from TOML files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use selector_motion::{MotionController, Slot, SystemConfig};
//!
//! // Load configuration from TOML
//! let config: SystemConfig = selector_motion::load_config("selector.toml")?;
//!
//! // Wire the controller to the hardware
//! let mut motion = MotionController::builder()
//!     .step_engine(engine)
//!     .driver(tmc_driver)
//!     .finda(finda_pin)
//!     .command_stream(uart)
//!     .clock(clock)
//!     .delay(delay)
//!     .fault_signaler(leds)
//!     .from_config(&config)
//!     .build()?;
//!
//! // Position both axes at filament slot 2 (homes first if needed)
//! motion.select_slot(Slot(2))?;
//! motion.engage_idler()?;
//! motion.feed_to_bondtech()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod hal;
pub mod motion;

// Re-exports for ergonomic API
pub use config::{validate_config, DriverConfig, SystemConfig, TransportConfig};
pub use error::{Error, Result};
pub use hal::{
    Axis, CommandStream, FaultSignaler, MicrosClock, StepEngine, StepperDriver, StepperMode,
};
pub use motion::{MotionController, MotionControllerBuilder, MotionState};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Slot, Steps};
