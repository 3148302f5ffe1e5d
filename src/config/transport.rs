//! Filament transport configuration.

use serde::Deserialize;

/// Filament transport configuration.
///
/// The Bowden length is the configured tube length in pulley steps. It is
/// persisted by the host application; this crate only consumes it to size
/// unload and feed travel.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Bowden tube length in pulley steps.
    pub bowden_length_steps: u16,
}

impl TransportConfig {
    /// Step budget for a feed toward the extruder gears.
    ///
    /// Filament is parked half-way down the tube, so a feed covers half the
    /// configured length.
    #[inline]
    pub fn feed_steps(&self) -> u16 {
        self.bowden_length_steps / 2
    }

    /// Step budget for an unload back to the presence sensor.
    ///
    /// Half the tube plus a fixed margin past the sensor position.
    #[inline]
    pub fn unload_steps(&self) -> i32 {
        i32::from(self.bowden_length_steps / 2) + UNLOAD_MARGIN_STEPS
    }
}

/// Extra unload travel past the half-tube point, in steps.
///
/// Covers the distance between the sensor and the tube midpoint so the
/// filament tip clears the sensor even with a short tube.
pub const UNLOAD_MARGIN_STEPS: i32 = 550;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_budgets() {
        let config = TransportConfig {
            bowden_length_steps: 8000,
        };

        assert_eq!(config.feed_steps(), 4000);
        assert_eq!(config.unload_steps(), 4550);
    }

    #[test]
    fn test_odd_length_rounds_down() {
        let config = TransportConfig {
            bowden_length_steps: 8001,
        };

        assert_eq!(config.feed_steps(), 4000);
        assert_eq!(config.unload_steps(), 4550);
    }
}
