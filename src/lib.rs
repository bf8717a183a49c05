#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`BuzzerPanel`**: Owns all panel state and runs one control loop iteration per `tick`
//! - **`InputPoller`**: Reads the six button lines and raises press / long-press events
//! - **`BuzzerMachine`**: Judge toggles and golden-buzzer mode; turns events into actions
//! - **`Dispatcher`**: Sends presets to the lighting engine and drives the auxiliary pin
//! - **`Settings`**: The seven tunables and their JSON settings document
//! - **`ButtonExpander`**: Trait to implement for your GPIO expander
//! - **`LightingEngine`**: Trait to implement for your lighting engine
//! - **`AuxOutput`**: Trait to implement for the auxiliary output pin
//! - **`SettingsStore`**: Trait to implement for settings persistence
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Button lines are active-low: a line reading `false` is a pressed button.

#[macro_use]
mod fmt;

pub mod time;
pub mod types;
pub mod command;
pub mod settings;
pub mod poller;
pub mod machine;
pub mod dispatcher;
pub mod panel;

pub use command::{Actions, PanelAction};
pub use dispatcher::{AUX_DISABLED, AuxOutput, Dispatcher, LightingEngine};
pub use machine::{BuzzerMachine, judge_preset};
pub use panel::{BuzzerPanel, PanelStatus, TickOutcome};
pub use poller::{ButtonExpander, Events, GpioBank, GpioBankError, InputPoller};
pub use settings::{DocumentError, NAMESPACE, Settings, SettingsError, SettingsStore};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use types::{Button, ButtonBank, ButtonEvent, JudgeState, Mode, UnknownButton};
