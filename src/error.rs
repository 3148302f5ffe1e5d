//! Error types for selector-motion library.
//!
//! Provides unified error handling across configuration, drive recovery, and
//! filament transport.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all selector-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Stepper drive error
    Drive(DriveError),
    /// Filament transport error
    Transport(TransportError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Bowden length out of the supported range
    InvalidBowdenLength(u16),
    /// Controller builder is missing a required component
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Stepper drive errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveError {
    /// The driver kept reporting a global fault after the full retry budget
    /// (three attempts). The caller must stop commanding motion.
    Unrecoverable,
    /// Driver chip re-initialization failed during recovery
    InitFailed,
}

/// Filament transport errors.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Reading the filament presence sensor line failed
    SensorRead,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Drive(e) => write!(f, "Drive error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidBowdenLength(v) => {
                write!(f, "Invalid Bowden length: {} steps. Must be 1000-16000", v)
            }
            ConfigError::MissingComponent(name) => {
                write!(f, "Missing controller component: {}", name)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::Unrecoverable => {
                write!(f, "Drive fault persisted through all retry attempts")
            }
            DriveError::InitFailed => write!(f, "Driver re-initialization failed"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::SensorRead => write!(f, "Filament sensor read failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DriveError> for Error {
    fn from(e: DriveError) -> Self {
        Error::Drive(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for DriveError {}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}
