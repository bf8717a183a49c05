//! The buzzer state machine.
//!
//! Converts button events into [`PanelAction`]s. The machine has two modes:
//!
//! - `Normal`: each judge press flips that judge's toggle and selects the
//!   preset encoding the four toggles (judge 1 = 1, judge 2 = 2, judge 3 = 4,
//!   judge 4 = 8). With every judge off the reset preset is selected instead
//!   of preset 0.
//! - `Golden`: entered by the golden buzzer. Judge presses are ignored until a
//!   reset press or until the golden buzzer times out.
//!
//! The machine performs no I/O. It returns the actions for the caller to
//! dispatch, which keeps it testable without hardware.

use crate::command::{Actions, PanelAction};
use crate::settings::Settings;
use crate::time::{TimeInstant, elapsed_exceeds};
use crate::types::{Button, ButtonEvent, JudgeState, Mode};

/// Judge toggles and golden-buzzer mode.
#[derive(Debug, Clone, Copy)]
pub struct BuzzerMachine<I> {
    judges: JudgeState,
    mode: Mode<I>,
}

impl<I: TimeInstant> BuzzerMachine<I> {
    /// Starts in `Normal` with every judge off.
    pub fn new() -> Self {
        Self {
            judges: JudgeState::new(),
            mode: Mode::Normal,
        }
    }

    /// Handles one event raised at `now`.
    pub fn handle(&mut self, event: ButtonEvent, now: I, settings: &Settings) -> Actions {
        match event {
            ButtonEvent::Pressed(Button::Golden) => self.golden(now, settings),
            ButtonEvent::Pressed(Button::Reset) => self.reset(settings),
            ButtonEvent::Pressed(judge) => self.judge(judge, settings),
            ButtonEvent::LongPress(Button::Reset) => self.shutdown(settings),
            ButtonEvent::LongPress(other) => {
                debug!("long press on {:?} has no action", other);
                Actions::new()
            }
        }
    }

    /// Resets the panel if the golden buzzer has been active longer than the
    /// configured timeout. Call once per poll, after the events.
    pub fn check_timeout(&mut self, now: I, settings: &Settings) -> Actions {
        match self.mode {
            Mode::Golden { since } if elapsed_exceeds(now, since, settings.gold_timeout_ms()) => {
                info!("Gold timeout");
                self.reset(settings)
            }
            _ => Actions::new(),
        }
    }

    fn judge(&mut self, button: Button, settings: &Settings) -> Actions {
        let mut actions = Actions::new();
        let Some(index) = button.judge() else {
            warn!("Unrecognised judge button {:?}", button);
            return actions;
        };

        info!("Judge {} pressed", index + 1);
        if self.mode.is_golden() {
            return actions;
        }

        self.judges.toggle(index);
        let preset = judge_preset(self.judges, settings);
        info!("Loading judge preset {}", preset);
        let _ = actions.push(PanelAction::ApplyPreset(preset));
        actions
    }

    fn golden(&mut self, now: I, settings: &Settings) -> Actions {
        info!("Golden buzzer, loading preset {}", settings.golden_preset);
        self.mode = Mode::Golden { since: now };

        let mut actions = Actions::new();
        let _ = actions.push(PanelAction::ApplyPreset(settings.golden_preset));
        let _ = actions.push(PanelAction::SetAux(true));
        actions
    }

    fn reset(&mut self, settings: &Settings) -> Actions {
        info!("Reset, loading preset {}", settings.reset_preset);
        self.mode = Mode::Normal;

        let mut actions = Actions::new();
        let _ = actions.push(PanelAction::ApplyPreset(settings.reset_preset));
        let _ = actions.push(PanelAction::SetAux(false));
        actions
    }

    fn shutdown(&mut self, settings: &Settings) -> Actions {
        info!("Shutting down, loading preset {}", settings.shutdown_preset);

        let mut actions = Actions::new();
        let _ = actions.push(PanelAction::ApplyPreset(settings.shutdown_preset));
        actions
    }

    /// Current mode.
    pub fn mode(&self) -> Mode<I> {
        self.mode
    }

    /// Current judge toggles.
    pub fn judges(&self) -> JudgeState {
        self.judges
    }

    pub fn is_golden(&self) -> bool {
        self.mode.is_golden()
    }
}

impl<I: TimeInstant> Default for BuzzerMachine<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Preset selected by a set of judge toggles.
///
/// Any non-empty set maps to its bit value in `1..=15`. The empty set maps to
/// the configured reset preset.
pub fn judge_preset(judges: JudgeState, settings: &Settings) -> u8 {
    if judges.all_off() {
        settings.reset_preset
    } else {
        judges.bits()
    }
}
