//! Configuration module for selector-motion.
//!
//! Provides types for loading and validating transport and driver
//! configurations from TOML files (with `std` feature) or pre-parsed data.

mod driver;
mod system;
mod transport;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use driver::DriverConfig;
pub use system::SystemConfig;
pub use transport::{TransportConfig, UNLOAD_MARGIN_STEPS};
pub use validation::{validate_config, MAX_BOWDEN_LENGTH_STEPS, MIN_BOWDEN_LENGTH_STEPS};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Slot, Steps};
