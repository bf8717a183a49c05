//! Carries out [`PanelAction`]s against the lighting engine and the auxiliary pin.

use crate::command::PanelAction;

/// Trait for abstracting the lighting engine that renders presets.
pub trait LightingEngine {
    /// Applies a numbered preset. Fire and forget: the outcome is not reported.
    fn apply_preset(&mut self, preset: u8);

    /// Returns true while the engine is pushing a frame out.
    ///
    /// Polling is skipped while busy so button reads do not contend with
    /// time-critical rendering on a shared bus.
    fn is_busy(&self) -> bool;
}

/// Trait for abstracting the auxiliary output pin, addressed by pin number.
pub trait AuxOutput {
    /// Configures `pin` as an output. Must be safe to repeat.
    fn configure_output(&mut self, pin: u8);

    /// Drives `pin` high (`true`) or low.
    fn write(&mut self, pin: u8, high: bool);
}

/// Pin number meaning "no auxiliary output".
pub const AUX_DISABLED: u8 = 0;

/// Forwards actions to the lighting engine and auxiliary output.
pub struct Dispatcher<L, A> {
    lighting: L,
    aux: A,
    last_preset: Option<u8>,
}

impl<L: LightingEngine, A: AuxOutput> Dispatcher<L, A> {
    pub fn new(lighting: L, aux: A) -> Self {
        Self {
            lighting,
            aux,
            last_preset: None,
        }
    }

    /// Executes one action. `aux_pin` is the configured auxiliary pin.
    pub fn dispatch(&mut self, action: PanelAction, aux_pin: u8) {
        match action {
            PanelAction::ApplyPreset(preset) => {
                self.lighting.apply_preset(preset);
                self.last_preset = Some(preset);
            }
            PanelAction::SetAux(high) => self.set_aux(aux_pin, high),
        }
    }

    fn set_aux(&mut self, pin: u8, high: bool) {
        if pin == AUX_DISABLED {
            return;
        }
        debug!("Driving golden output pin {} {}", pin, if high { "high" } else { "low" });
        self.aux.configure_output(pin);
        self.aux.write(pin, high);
    }

    pub fn lighting_busy(&self) -> bool {
        self.lighting.is_busy()
    }

    /// Preset most recently sent to the lighting engine.
    pub fn last_preset(&self) -> Option<u8> {
        self.last_preset
    }

    pub fn lighting(&self) -> &L {
        &self.lighting
    }

    pub fn lighting_mut(&mut self) -> &mut L {
        &mut self.lighting
    }

    pub fn aux(&self) -> &A {
        &self.aux
    }
}
