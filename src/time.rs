//! Time abstraction traits for platform-agnostic timing.
//!
//! The panel only ever asks "how long since?", so instants need nothing more
//! than [`TimeInstant::duration_since`]. Implementations backed by a counter
//! that wraps must compute that difference modulo the counter width; [`Millis`]
//! does so for the common 32-bit millisecond tick.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Must stay correct when the underlying counter has wrapped between
    /// `earlier` and `self`.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Millisecond tick from a free-running 32-bit counter.
///
/// The counter wraps roughly every 49.7 days. Differences are taken modulo
/// 2^32, so any interval shorter than one full wrap is measured correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

/// Elapsed milliseconds between two [`Millis`] ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisDuration(pub u32);

impl TimeDuration for MillisDuration {
    #[inline]
    fn as_millis(&self) -> u64 {
        u64::from(self.0)
    }
}

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    #[inline]
    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0))
    }
}

/// Returns true once strictly more than `threshold_ms` has passed since `start`.
#[inline]
pub(crate) fn elapsed_exceeds<I: TimeInstant>(now: I, start: I, threshold_ms: u64) -> bool {
    now.duration_since(start).as_millis() > threshold_ms
}
