//! Shared test infrastructure for golden-buzzer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use golden_buzzer::{
    AuxOutput, Button, BuzzerPanel, ButtonExpander, LightingEngine, Millis, Settings,
    SettingsStore, TimeSource,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<Millis>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: Cell::new(Millis(millis)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like hardware
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Millis(current.0.wrapping_add(millis)));
    }

    /// Current raw tick
    pub fn now_millis(&self) -> u32 {
        self.current_time.get().0
    }

    pub fn set_time(&self, time: Millis) {
        self.current_time.set(time);
    }
}

impl TimeSource<Millis> for MockTimeSource {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Expander
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockExpanderError;

/// Mock expander with settable line levels. All lines start high (released).
pub struct MockExpander {
    levels: [bool; 8],
    connect_fails: bool,
    failing_line: Option<u8>,
    reads: usize,
}

impl MockExpander {
    pub fn new() -> Self {
        Self {
            levels: [true; 8],
            connect_fails: false,
            failing_line: None,
            reads: 0,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            connect_fails: true,
            ..Self::new()
        }
    }

    pub fn press(&mut self, button: Button) {
        self.levels[button.line() as usize] = false;
    }

    pub fn release(&mut self, button: Button) {
        self.levels[button.line() as usize] = true;
    }

    pub fn fail_line(&mut self, line: Option<u8>) {
        self.failing_line = line;
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ButtonExpander for MockExpander {
    type Error = MockExpanderError;

    fn connect(&mut self) -> Result<(), Self::Error> {
        if self.connect_fails {
            Err(MockExpanderError)
        } else {
            Ok(())
        }
    }

    fn read_line(&mut self, line: u8) -> Result<bool, Self::Error> {
        self.reads += 1;
        if self.failing_line == Some(line) {
            return Err(MockExpanderError);
        }
        Ok(self.levels[line as usize])
    }
}

// ============================================================================
// Mock Lighting Engine
// ============================================================================

/// Mock lighting engine that records every preset applied
pub struct MockLighting {
    presets: heapless::Vec<u8, 64>,
    busy: bool,
}

impl MockLighting {
    pub fn new() -> Self {
        Self {
            presets: heapless::Vec::new(),
            busy: false,
        }
    }

    pub fn presets(&self) -> &[u8] {
        &self.presets
    }

    pub fn last_preset(&self) -> Option<u8> {
        self.presets.last().copied()
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

impl LightingEngine for MockLighting {
    fn apply_preset(&mut self, preset: u8) {
        let _ = self.presets.push(preset);
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}

// ============================================================================
// Mock Aux Output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxCall {
    Configure(u8),
    Write(u8, bool),
}

/// Mock auxiliary output that records configure and write calls
pub struct MockAux {
    calls: heapless::Vec<AuxCall, 32>,
}

impl MockAux {
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
        }
    }

    pub fn calls(&self) -> &[AuxCall] {
        &self.calls
    }

    /// Level most recently written to any pin
    pub fn last_level(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            AuxCall::Write(_, level) => Some(*level),
            AuxCall::Configure(_) => None,
        })
    }
}

impl AuxOutput for MockAux {
    fn configure_output(&mut self, pin: u8) {
        let _ = self.calls.push(AuxCall::Configure(pin));
    }

    fn write(&mut self, pin: u8, high: bool) {
        let _ = self.calls.push(AuxCall::Write(pin, high));
    }
}

// ============================================================================
// Mock Settings Store
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockStoreError;

/// In-memory settings store
pub struct MockStore {
    document: heapless::Vec<u8, 512>,
    fails: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            document: heapless::Vec::new(),
            fails: false,
        }
    }

    pub fn with_document(json: &str) -> Self {
        let mut store = Self::new();
        store
            .document
            .extend_from_slice(json.as_bytes())
            .expect("document fits");
        store
    }

    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::new()
        }
    }

    pub fn document(&self) -> &str {
        core::str::from_utf8(&self.document).expect("utf-8 document")
    }
}

impl SettingsStore for MockStore {
    type Error = MockStoreError;

    fn load(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fails {
            return Err(MockStoreError);
        }
        buf[..self.document.len()].copy_from_slice(&self.document);
        Ok(self.document.len())
    }

    fn save(&mut self, document: &[u8]) -> Result<(), Self::Error> {
        if self.fails {
            return Err(MockStoreError);
        }
        self.document.clear();
        self.document
            .extend_from_slice(document)
            .map_err(|_| MockStoreError)
    }
}

// ============================================================================
// Panel Helpers
// ============================================================================

pub type TestPanel<'t> = BuzzerPanel<'t, Millis, MockTimeSource, MockExpander, MockLighting, MockAux>;

/// Poll interval used by the default settings
pub const POLL_MS: u32 = 50;

/// Aux pin used by tests that exercise the golden output
pub const AUX_PIN: u8 = 5;

/// Creates an initialised panel with default settings
pub fn panel(timer: &MockTimeSource) -> TestPanel<'_> {
    panel_with(timer, Settings::DEFAULT)
}

/// Creates an initialised panel with the aux output enabled on `AUX_PIN`
pub fn panel_with_aux(timer: &MockTimeSource) -> TestPanel<'_> {
    panel_with(
        timer,
        Settings {
            aux_pin: AUX_PIN,
            ..Settings::DEFAULT
        },
    )
}

pub fn panel_with(timer: &MockTimeSource, settings: Settings) -> TestPanel<'_> {
    let mut panel = BuzzerPanel::with_settings(
        MockExpander::new(),
        MockLighting::new(),
        MockAux::new(),
        timer,
        settings,
    );
    assert!(panel.init());
    panel
}

/// Advances one poll interval and ticks
pub fn step(panel: &mut TestPanel<'_>, timer: &MockTimeSource) {
    timer.advance(POLL_MS);
    panel.tick();
}

/// Presses and releases `button` across two polls
pub fn tap(panel: &mut TestPanel<'_>, timer: &MockTimeSource, button: Button) {
    panel.expander_mut().press(button);
    step(panel, timer);
    panel.expander_mut().release(button);
    step(panel, timer);
}
