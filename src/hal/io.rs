//! Platform I/O seams: command channel, microsecond clock, fault signaling.
//!
//! The filament presence sensor is not abstracted here - it is a plain
//! `embedded_hal::digital::InputPin` (high = filament present).

/// Non-blocking single-byte reader on the host communication channel.
///
/// Only consumed during a feed, where an in-band sentinel byte signals that
/// the enclosure door opened and the feed must abort.
pub trait CommandStream {
    /// Take one pending byte, if any.
    fn poll(&mut self) -> Option<u8>;
}

/// Free-running microsecond clock.
///
/// Wraps on overflow; consumers compute elapsed time with wrapping
/// subtraction, so the absolute reference point is irrelevant.
pub trait MicrosClock {
    /// Current clock value in microseconds.
    fn micros(&mut self) -> u32;
}

/// Fault presentation seam.
///
/// How faults are shown (LED patterns, host notifications) is owned by the
/// collaborator behind this trait; the motion core only reports the events.
pub trait FaultSignaler {
    /// A drive fault was detected and a recovery attempt follows.
    fn drive_error(&mut self);

    /// The retry budget is exhausted with the fault still present. No further
    /// motion will be commanded.
    fn unrecoverable_error(&mut self);
}
