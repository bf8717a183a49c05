//! The buzzer panel control object.
//!
//! Provides [`BuzzerPanel`], which owns every piece of mutable state (button
//! snapshot, judge toggles, golden-buzzer mode, timers, settings) and ties the
//! poller, state machine and dispatcher together. The host calls
//! [`BuzzerPanel::init`] once and [`BuzzerPanel::tick`] from its main loop; the
//! panel throttles itself to the configured poll interval.

use crate::dispatcher::{AuxOutput, Dispatcher, LightingEngine};
use crate::machine::BuzzerMachine;
use crate::poller::{ButtonExpander, InputPoller};
use crate::settings::{DOCUMENT_CAPACITY, DocumentError, Settings, SettingsError, SettingsStore};
use crate::time::{TimeInstant, TimeSource};
use crate::types::{ButtonBank, JudgeState, Mode};

/// Result of a single [`BuzzerPanel::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// The expander never connected. The panel does nothing.
    Inert,
    /// The poll interval has not elapsed yet.
    NotDue,
    /// The lighting engine is mid-update.
    LightingBusy,
    /// The buttons were polled and this many events were handled.
    Polled { events: usize },
}

/// Snapshot of the panel for host status pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelStatus<I> {
    pub connected: bool,
    pub mode: Mode<I>,
    pub judges: JudgeState,
    pub buttons: ButtonBank,
    pub last_preset: Option<u8>,
}

/// Controls the buzzer panel through its expander, lighting engine and aux pin.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `X` - Button expander implementation type
/// * `L` - Lighting engine implementation type
/// * `A` - Auxiliary output implementation type
pub struct BuzzerPanel<'t, I, T, X, L, A>
where
    I: TimeInstant,
    T: TimeSource<I>,
    X: ButtonExpander,
    L: LightingEngine,
    A: AuxOutput,
{
    time_source: &'t T,
    expander: X,
    connected: bool,
    poller: InputPoller<I>,
    machine: BuzzerMachine<I>,
    dispatcher: Dispatcher<L, A>,
    settings: Settings,
}

impl<'t, I, T, X, L, A> BuzzerPanel<'t, I, T, X, L, A>
where
    I: TimeInstant,
    T: TimeSource<I>,
    X: ButtonExpander,
    L: LightingEngine,
    A: AuxOutput,
{
    /// Creates a panel with default settings. Call [`init`](Self::init) before ticking.
    pub fn new(expander: X, lighting: L, aux: A, time_source: &'t T) -> Self {
        Self::with_settings(expander, lighting, aux, time_source, Settings::DEFAULT)
    }

    /// Creates a panel with settings the host has already loaded.
    pub fn with_settings(
        expander: X,
        lighting: L,
        aux: A,
        time_source: &'t T,
        settings: Settings,
    ) -> Self {
        Self {
            time_source,
            expander,
            connected: false,
            poller: InputPoller::new(),
            machine: BuzzerMachine::new(),
            dispatcher: Dispatcher::new(lighting, aux),
            settings,
        }
    }

    /// Connects to the button expander.
    ///
    /// A failed connection is not retried. The panel stays inert for the rest
    /// of its life and every tick returns [`TickOutcome::Inert`].
    pub fn init(&mut self) -> bool {
        match self.expander.connect() {
            Ok(()) => {
                info!("Connected to button expander");
                self.connected = true;
            }
            Err(_) => {
                error!("Not connected to button expander, buttons disabled");
                self.connected = false;
            }
        }
        self.connected
    }

    /// Connects like [`init`](Self::init), then writes the current settings to
    /// `store` once so the host document carries every panel key.
    ///
    /// A failed write is logged and does not change the returned connection state.
    pub fn init_with_store<S: SettingsStore>(&mut self, store: &mut S) -> bool {
        let connected = self.init();
        if self.save_settings(store).is_err() {
            warn!("Could not write settings at start-up");
        }
        connected
    }

    /// Runs one iteration of the control loop.
    ///
    /// Polls the buttons if due, handles the resulting events in line order,
    /// then checks the golden buzzer timeout.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.connected {
            return TickOutcome::Inert;
        }

        let now = self.time_source.now();
        if !self.poller.is_due(now, self.settings.update_every_ms) {
            return TickOutcome::NotDue;
        }
        if self.dispatcher.lighting_busy() {
            return TickOutcome::LightingBusy;
        }

        let events = self
            .poller
            .poll(&mut self.expander, now, self.settings.long_press_ms);

        for event in &events {
            let actions = self.machine.handle(*event, now, &self.settings);
            for action in actions {
                self.dispatcher.dispatch(action, self.settings.aux_pin);
            }
        }

        for action in self.machine.check_timeout(now, &self.settings) {
            self.dispatcher.dispatch(action, self.settings.aux_pin);
        }

        TickOutcome::Polled {
            events: events.len(),
        }
    }

    /// Writes the settings document into `buf` and returns its length.
    pub fn export_settings(&self, buf: &mut [u8]) -> Result<usize, DocumentError> {
        self.settings.export(buf)
    }

    /// Merges a settings document into the current settings.
    pub fn import_settings(&mut self, json: &[u8]) -> Result<(), DocumentError> {
        self.settings.import(json).inspect_err(|_| {
            warn!("Ignoring unreadable settings document");
        })
    }

    /// Reads settings from `store`. An empty store leaves the settings unchanged.
    pub fn load_settings<S: SettingsStore>(
        &mut self,
        store: &mut S,
    ) -> Result<(), SettingsError<S::Error>> {
        let mut buf = [0u8; DOCUMENT_CAPACITY];
        let len = store.load(&mut buf).map_err(SettingsError::Store)?;
        if len == 0 {
            debug!("No stored settings, keeping defaults");
            return Ok(());
        }
        let document = buf.get(..len).ok_or(DocumentError::BufferTooSmall)?;
        self.import_settings(document)?;
        Ok(())
    }

    /// Writes the current settings to `store`.
    pub fn save_settings<S: SettingsStore>(
        &self,
        store: &mut S,
    ) -> Result<(), SettingsError<S::Error>> {
        let mut buf = [0u8; DOCUMENT_CAPACITY];
        let len = self.export_settings(&mut buf)?;
        store.save(&buf[..len]).map_err(SettingsError::Store)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns true if the expander connected during [`init`](Self::init).
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn status(&self) -> PanelStatus<I> {
        PanelStatus {
            connected: self.connected,
            mode: self.machine.mode(),
            judges: self.machine.judges(),
            buttons: *self.poller.levels(),
            last_preset: self.dispatcher.last_preset(),
        }
    }

    pub fn expander_mut(&mut self) -> &mut X {
        &mut self.expander
    }

    pub fn lighting(&self) -> &L {
        self.dispatcher.lighting()
    }

    pub fn lighting_mut(&mut self) -> &mut L {
        self.dispatcher.lighting_mut()
    }

    pub fn aux(&self) -> &A {
        self.dispatcher.aux()
    }
}
