//! Button polling with edge detection and long-press tracking.
//!
//! Provides [`InputPoller`], which turns raw line levels into [`ButtonEvent`]s,
//! and the [`ButtonExpander`] trait the poller reads lines through.

use embedded_hal::digital::InputPin;

use crate::time::{TimeDuration, TimeInstant, elapsed_exceeds};
use crate::types::{BUTTON_COUNT, Button, ButtonBank, ButtonEvent};

/// Maximum events one poll can raise: a press on every line plus one long press.
pub const MAX_EVENTS: usize = BUTTON_COUNT + 1;

/// Events raised by a single poll, in line order.
pub type Events = heapless::Vec<ButtonEvent, MAX_EVENTS>;

/// Trait for abstracting the GPIO expander the buttons are wired to.
pub trait ButtonExpander {
    type Error;

    /// Opens the connection to the expander. Called once at start-up.
    fn connect(&mut self) -> Result<(), Self::Error>;

    /// Reads the raw level of `line` (0-7). `false` is low.
    fn read_line(&mut self, line: u8) -> Result<bool, Self::Error>;
}

/// Buttons wired straight to MCU pins instead of through an expander.
///
/// Line `n` reads `pins[n]`. Lines without a pin read an error.
pub struct GpioBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: InputPin, const N: usize> GpioBank<P, N> {
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    /// Releases the pins.
    pub fn free(self) -> [P; N] {
        self.pins
    }
}

/// Error from [`GpioBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioBankError<E> {
    /// No pin is wired to the requested line.
    NoSuchLine(u8),
    /// The pin itself failed.
    Pin(E),
}

impl<P: InputPin, const N: usize> ButtonExpander for GpioBank<P, N> {
    type Error = GpioBankError<P::Error>;

    fn connect(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn read_line(&mut self, line: u8) -> Result<bool, Self::Error> {
        let pin = self
            .pins
            .get_mut(usize::from(line))
            .ok_or(GpioBankError::NoSuchLine(line))?;
        pin.is_high().map_err(GpioBankError::Pin)
    }
}

/// Polls the button lines and raises press and long-press events.
///
/// Debouncing is purely edge based: a line only raises an event when its level
/// differs from the previous poll and the new level is the pressed level.
/// Releases never raise events. Noise is filtered by the poll interval alone.
#[derive(Debug, Clone)]
pub struct InputPoller<I> {
    previous: ButtonBank,
    last_poll: Option<I>,
    reset_pressed_at: Option<I>,
}

impl<I: TimeInstant> InputPoller<I> {
    /// Creates a poller that assumes every button starts released.
    pub fn new() -> Self {
        Self {
            previous: ButtonBank::released(),
            last_poll: None,
            reset_pressed_at: None,
        }
    }

    /// Returns true if at least `interval_ms` has passed since the last poll.
    ///
    /// The first poll is always due.
    pub fn is_due(&self, now: I, interval_ms: u32) -> bool {
        match self.last_poll {
            None => true,
            Some(last) => now.duration_since(last).as_millis() >= u64::from(interval_ms),
        }
    }

    /// Reads every line once and returns the events raised.
    ///
    /// The new level of each line is stored for the next poll whether or not it
    /// raised an event. A line whose read fails keeps its previous level.
    ///
    /// While the reset button is held with a recorded press start, a
    /// [`ButtonEvent::LongPress`] is raised once `long_press_ms` has been
    /// exceeded. The press start is then cleared, so a single hold fires once.
    pub fn poll<X: ButtonExpander>(
        &mut self,
        expander: &mut X,
        now: I,
        long_press_ms: u32,
    ) -> Events {
        self.last_poll = Some(now);
        let mut events = Events::new();

        for button in Button::ALL {
            let level = match expander.read_line(button.line()) {
                Ok(level) => level,
                Err(_) => {
                    warn!("failed to read button line {}", button.line());
                    continue;
                }
            };

            let pressed = level == ButtonBank::PRESSED_LEVEL;
            if level != self.previous[button] {
                trace!("line {} changed to {}", button.line(), level);
            }
            if level != self.previous[button] && pressed {
                if button == Button::Reset {
                    self.reset_pressed_at = Some(now);
                }
                // Capacity covers one press per line plus the long press.
                let _ = events.push(ButtonEvent::Pressed(button));
            }

            if button == Button::Reset && pressed {
                if let Some(start) = self.reset_pressed_at {
                    if elapsed_exceeds(now, start, u64::from(long_press_ms)) {
                        self.reset_pressed_at = None;
                        let _ = events.push(ButtonEvent::LongPress(button));
                    }
                }
            }

            self.previous[button] = level;
        }

        events
    }

    /// Levels stored by the last poll.
    pub fn levels(&self) -> &ButtonBank {
        &self.previous
    }

    /// Start of the current reset hold, if a long press is still armed.
    pub fn reset_pressed_at(&self) -> Option<I> {
        self.reset_pressed_at
    }
}

impl<I: TimeInstant> Default for InputPoller<I> {
    fn default() -> Self {
        Self::new()
    }
}
