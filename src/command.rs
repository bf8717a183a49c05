//! Effects requested by the state machine.

/// A single external effect for the dispatcher to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelAction {
    /// Ask the lighting engine to apply a preset.
    ApplyPreset(u8),
    /// Drive the auxiliary output pin high (`true`) or low.
    SetAux(bool),
}

/// Upper bound on actions produced by one event.
pub const MAX_ACTIONS: usize = 2;

/// Actions produced by one state machine step, in execution order.
pub type Actions = heapless::Vec<PanelAction, MAX_ACTIONS>;
