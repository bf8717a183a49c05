//! Core types shared by the poller and the state machine.

use core::ops::{Index, IndexMut};

/// Number of physical button lines read from the expander.
pub const BUTTON_COUNT: usize = 6;

/// One of the six physical buttons on the panel.
///
/// The discriminant is the expander line the button is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Judge1 = 0,
    Judge2 = 1,
    Judge3 = 2,
    Judge4 = 3,
    /// The golden buzzer.
    Golden = 4,
    /// Short press resets, long press shuts the show down.
    Reset = 5,
}

impl Button {
    /// All buttons in line order. Polling and event handling follow this order.
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Judge1,
        Button::Judge2,
        Button::Judge3,
        Button::Judge4,
        Button::Golden,
        Button::Reset,
    ];

    /// Expander line this button is wired to.
    #[inline]
    pub const fn line(self) -> u8 {
        self as u8
    }

    /// Zero-based judge number for the four judge buttons.
    #[inline]
    pub const fn judge(self) -> Option<usize> {
        match self {
            Button::Judge1 => Some(0),
            Button::Judge2 => Some(1),
            Button::Judge3 => Some(2),
            Button::Judge4 => Some(3),
            Button::Golden | Button::Reset => None,
        }
    }
}

/// Returned when a raw line number does not name a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownButton(pub u8);

impl core::fmt::Display for UnknownButton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "no button is wired to line {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownButton {}

impl TryFrom<u8> for Button {
    type Error = UnknownButton;

    fn try_from(line: u8) -> Result<Self, Self::Error> {
        Button::ALL
            .iter()
            .copied()
            .find(|button| button.line() == line)
            .ok_or(UnknownButton(line))
    }
}

/// Last raw level read for every button line.
///
/// Levels are electrical: the buttons are active-low, so `false` means pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonBank {
    levels: [bool; BUTTON_COUNT],
}

impl ButtonBank {
    /// Level a line reads while its button is held down.
    pub const PRESSED_LEVEL: bool = false;

    /// A bank with every button released (all lines pulled high).
    pub const fn released() -> Self {
        Self {
            levels: [!Self::PRESSED_LEVEL; BUTTON_COUNT],
        }
    }

    /// Returns true if the stored level for `button` is the pressed level.
    #[inline]
    pub fn is_pressed(&self, button: Button) -> bool {
        self[button] == Self::PRESSED_LEVEL
    }
}

impl Default for ButtonBank {
    fn default() -> Self {
        Self::released()
    }
}

impl Index<Button> for ButtonBank {
    type Output = bool;

    fn index(&self, button: Button) -> &bool {
        &self.levels[button as usize]
    }
}

impl IndexMut<Button> for ButtonBank {
    fn index_mut(&mut self, button: Button) -> &mut bool {
        &mut self.levels[button as usize]
    }
}

/// Discrete input event raised by the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// The line went from released to pressed since the previous poll.
    Pressed(Button),
    /// The button has been held past the long-press threshold.
    LongPress(Button),
}

/// The four judge toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JudgeState {
    bits: u8,
}

impl JudgeState {
    /// All judges off.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Flips the toggle for judge `index` (0-3). Other indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index < 4 {
            self.bits ^= 1 << index;
        }
    }

    /// Returns the toggle for judge `index` (0-3).
    pub fn is_on(&self, index: usize) -> bool {
        index < 4 && self.bits & (1 << index) != 0
    }

    /// Judge 1 is bit 0 through judge 4 at bit 3, giving a value in 0..=15.
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub const fn all_off(&self) -> bool {
        self.bits == 0
    }
}

/// Operating mode of the buzzer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode<I> {
    /// Judges may toggle their buzzers.
    Normal,
    /// Golden buzzer active since the contained instant. Judges are locked out.
    Golden { since: I },
}

impl<I> Mode<I> {
    #[inline]
    pub fn is_golden(&self) -> bool {
        matches!(self, Mode::Golden { .. })
    }
}
