//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use selector_motion::load_config;
///
/// let config = load_config("selector.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::StepperMode;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[transport]
bowden_length_steps = 8000
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.bowden_length_steps(), 8000);
        assert_eq!(config.driver.mode, StepperMode::Normal);
    }

    #[test]
    fn test_parse_stealth_mode() {
        let toml = r#"
[transport]
bowden_length_steps = 8000

[driver]
mode = "stealth"
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.driver.mode, StepperMode::Stealth);
    }

    #[test]
    fn test_reject_out_of_range_bowden_length() {
        let toml = r#"
[transport]
bowden_length_steps = 200
"#;

        let result = parse_config(toml);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidBowdenLength(200)))
        ));
    }
}
