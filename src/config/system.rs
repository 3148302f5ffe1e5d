//! System configuration - root configuration structure.

use serde::Deserialize;

use super::driver::DriverConfig;
use super::transport::TransportConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Filament transport configuration.
    pub transport: TransportConfig,

    /// Stepper driver configuration.
    #[serde(default)]
    pub driver: DriverConfig,
}

impl SystemConfig {
    /// Bowden tube length in pulley steps.
    #[inline]
    pub fn bowden_length_steps(&self) -> u16 {
        self.transport.bowden_length_steps
    }
}
