//! Unit types for physical quantities.
//!
//! Provides type-safe representations of logical slot indices and pulley step
//! counts to prevent unit confusion at compile time.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Logical slot index on the idler or selector axis.
///
/// Slot 0 is the homing position on both axes. The mapping from slot index to
/// physical step count belongs to the step engine, not to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(transparent)]
pub struct Slot(pub u8);

impl Slot {
    /// The homing position.
    pub const HOME: Slot = Slot(0);

    /// Create a new slot index.
    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Get the raw index.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Pulley travel in steps.
///
/// Signed so that deltas in either direction are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(transparent)]
pub struct Steps(pub i32);

impl Steps {
    /// Create a new step count.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Add for Steps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Steps {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ordering() {
        assert!(Slot(0) < Slot(4));
        assert_eq!(Slot::HOME, Slot(0));
    }

    #[test]
    fn test_steps_arithmetic() {
        assert_eq!(Steps(400) + Steps(-150), Steps(250));
        assert_eq!(Steps(400) - Steps(150), Steps(250));
    }
}
