//! Persistent panel settings and their JSON document form.
//!
//! The host keeps one settings document shared by many components. This panel
//! owns a single object in it:
//!
//! ```json
//! {"Britains Got Talent": {"Update Buttons Every": 50, "Golden Buzzer Timeout": 20, ...}}
//! ```
//!
//! Reading merges into the current values rather than replacing them. Each field
//! is taken on its own: a missing key, an unknown key, a non-integer value or a
//! value outside the field's range leaves that one field untouched. Unknown keys
//! and other components' sections are skipped.

use core::fmt;

use serde::de::{DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Key of the panel's object inside the host settings document.
pub const NAMESPACE: &str = "Britains Got Talent";

/// Size of the scratch buffer used when going through a [`SettingsStore`].
pub const DOCUMENT_CAPACITY: usize = 512;

/// Tunable values of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Minimum time between button polls, in milliseconds.
    #[serde(rename = "Update Buttons Every")]
    pub update_every_ms: u32,

    /// How long a golden buzzer stays active without a reset, in seconds.
    #[serde(rename = "Golden Buzzer Timeout")]
    pub gold_timeout_s: u32,

    /// Hold time of the reset button that triggers shutdown, in milliseconds.
    #[serde(rename = "Reset Button Long Press Time")]
    pub long_press_ms: u32,

    #[serde(rename = "Preset Number For Golden Buzzer")]
    pub golden_preset: u8,

    /// Also used when every judge has been toggled off.
    #[serde(rename = "Preset Number For Reset")]
    pub reset_preset: u8,

    #[serde(rename = "Preset Number For Shutdown")]
    pub shutdown_preset: u8,

    /// Auxiliary output driven high during a golden buzzer. `0` disables it.
    #[serde(rename = "Golden Buzzer GPIO Output Pin")]
    pub aux_pin: u8,
}

impl Settings {
    pub const DEFAULT: Self = Self {
        update_every_ms: 50,
        gold_timeout_s: 20,
        long_press_ms: 2000,
        golden_preset: 20,
        reset_preset: 50,
        shutdown_preset: 99,
        aux_pin: 0,
    };

    /// Golden buzzer timeout in milliseconds.
    #[inline]
    pub fn gold_timeout_ms(&self) -> u64 {
        u64::from(self.gold_timeout_s) * 1000
    }

    /// Serialises the settings document into `buf`, returning the length written.
    pub fn export(&self, buf: &mut [u8]) -> Result<usize, DocumentError> {
        let document = ExportDocument { panel: self };
        serde_json_core::to_slice(&document, buf).map_err(|err| match err {
            serde_json_core::ser::Error::BufferFull => DocumentError::BufferTooSmall,
            _ => DocumentError::Serialize,
        })
    }

    /// Merges the values found in a settings document into `self`.
    ///
    /// A document without the panel's object is accepted and changes nothing.
    /// If the document cannot be parsed at all, `self` is left as it was.
    pub fn import(&mut self, json: &[u8]) -> Result<(), DocumentError> {
        let (document, _) = serde_json_core::from_slice::<DocumentShape>(json)
            .map_err(|_| DocumentError::Parse)?;
        if document.panel.is_none() {
            debug!("settings document has no panel section");
            return Ok(());
        }

        merge_field(json, "Update Buttons Every", &mut self.update_every_ms);
        merge_field(json, "Golden Buzzer Timeout", &mut self.gold_timeout_s);
        merge_field(json, "Reset Button Long Press Time", &mut self.long_press_ms);
        merge_field(json, "Preset Number For Golden Buzzer", &mut self.golden_preset);
        merge_field(json, "Preset Number For Reset", &mut self.reset_preset);
        merge_field(json, "Preset Number For Shutdown", &mut self.shutdown_preset);
        merge_field(json, "Golden Buzzer GPIO Output Pin", &mut self.aux_pin);
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors encoding or decoding the settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DocumentError {
    /// The document is not valid JSON.
    Parse,
    /// The settings could not be encoded.
    Serialize,
    /// The output buffer cannot hold the document.
    BufferTooSmall,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Parse => write!(f, "settings document is not valid JSON"),
            DocumentError::Serialize => write!(f, "settings could not be serialised"),
            DocumentError::BufferTooSmall => {
                write!(f, "buffer too small for settings document")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DocumentError {}

/// Errors loading or saving settings through a [`SettingsStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError<E> {
    /// The backing store failed.
    Store(E),
    /// The document could not be read or written.
    Document(DocumentError),
}

impl<E> From<DocumentError> for SettingsError<E> {
    fn from(err: DocumentError) -> Self {
        SettingsError::Document(err)
    }
}

impl<E: fmt::Debug> fmt::Display for SettingsError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Store(err) => write!(f, "settings store failed: {:?}", err),
            SettingsError::Document(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for SettingsError<E> {}

/// Host-side persistence for the settings document.
pub trait SettingsStore {
    type Error;

    /// Copies the stored document into `buf` and returns its length.
    /// An empty store returns `Ok(0)`.
    fn load(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Replaces the stored document.
    fn save(&mut self, document: &[u8]) -> Result<(), Self::Error>;
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    #[serde(rename = "Britains Got Talent")]
    panel: &'a Settings,
}

/// Structure of an importable document. Only checks that the document is
/// well formed and whether the panel's object is present.
#[derive(Deserialize)]
struct DocumentShape {
    #[serde(rename = "Britains Got Talent", default)]
    panel: Option<PanelShape>,
}

#[derive(Deserialize)]
struct PanelShape {}

/// Value found under one key of the panel's object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Absent,
    Null,
    Integer(i64),
}

/// Replaces `slot` with the integer stored under `key`, if it fits `T`.
///
/// `serde-json-core` cannot inspect a value of unknown type, so each field is
/// looked up in a separate pass. A value that fails to decode as an integer
/// only aborts its own pass and the field keeps its current value.
fn merge_field<T: TryFrom<i64>>(json: &[u8], key: &'static str, slot: &mut T) {
    match read_entry(json, key) {
        Ok(Entry::Absent) => {}
        Ok(Entry::Integer(raw)) => match T::try_from(raw) {
            Ok(value) => *slot = value,
            Err(_) => warn!("ignoring out of range value {} for \"{}\"", raw, key),
        },
        Ok(Entry::Null) | Err(_) => warn!("ignoring non-integer value for \"{}\"", key),
    }
}

fn read_entry(json: &[u8], key: &'static str) -> Result<Entry, serde_json_core::de::Error> {
    let mut deserializer = serde_json_core::de::Deserializer::new(json, None);
    let entry = DocumentLookup(key).deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(entry)
}

/// Walks the top-level object down to the panel's object.
struct DocumentLookup(&'static str);

impl<'de> DeserializeSeed<'de> for DocumentLookup {
    type Value = Entry;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Entry, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for DocumentLookup {
    type Value = Entry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a settings document")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entry, A::Error> {
        let mut entry = Entry::Absent;
        while let Some(key) = map.next_key::<&str>()? {
            if key == NAMESPACE {
                entry = map.next_value_seed(PanelLookup(self.0))?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(entry)
    }
}

/// Picks one key out of the panel's object, skipping the others.
struct PanelLookup(&'static str);

impl<'de> DeserializeSeed<'de> for PanelLookup {
    type Value = Entry;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Entry, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for PanelLookup {
    type Value = Entry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the panel settings object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entry, A::Error> {
        let mut entry = Entry::Absent;
        while let Some(key) = map.next_key::<&str>()? {
            if key == self.0 {
                entry = match map.next_value::<Option<i64>>()? {
                    Some(value) => Entry::Integer(value),
                    None => Entry::Null,
                };
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(entry)
    }
}
