//! Stepper driver configuration.

use serde::Deserialize;

use crate::hal::StepperMode;

/// Stepper driver configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverConfig {
    /// Active current/chopper mode profile.
    ///
    /// Normal mode runs higher current and enables the extra ramp terms in
    /// the transport loops; stealth mode trades torque for silence.
    #[serde(default)]
    pub mode: StepperMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        let config = DriverConfig::default();
        assert_eq!(config.mode, StepperMode::Normal);
    }
}
