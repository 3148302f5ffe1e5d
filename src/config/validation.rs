//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Smallest usable Bowden length in steps.
///
/// Below this the unload budget margin dominates the travel and the sensor
/// can never be reached.
pub const MIN_BOWDEN_LENGTH_STEPS: u16 = 1000;

/// Largest supported Bowden length in steps.
pub const MAX_BOWDEN_LENGTH_STEPS: u16 = 16000;

/// Validate a system configuration.
///
/// Checks:
/// - Bowden length is within the supported range
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_transport(&config.transport)?;
    Ok(())
}

fn validate_transport(config: &super::TransportConfig) -> Result<()> {
    if config.bowden_length_steps < MIN_BOWDEN_LENGTH_STEPS
        || config.bowden_length_steps > MAX_BOWDEN_LENGTH_STEPS
    {
        return Err(Error::Config(ConfigError::InvalidBowdenLength(
            config.bowden_length_steps,
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportConfig;

    #[test]
    fn test_bowden_length_too_short() {
        let config = TransportConfig {
            bowden_length_steps: 400,
        };

        let result = validate_transport(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidBowdenLength(400)))
        ));
    }

    #[test]
    fn test_bowden_length_in_range() {
        let config = TransportConfig {
            bowden_length_steps: 8000,
        };

        assert!(validate_transport(&config).is_ok());
    }
}
