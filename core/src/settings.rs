//! Persisted settings with command-line precedence.
//!
//! A settings file is a YAML map from long option name to value:
//!
//! ```yaml
//! resolution: pal
//! delay: -120
//! scale: "1.0,1.2"
//! move-x: [left, 8]
//! swap: true
//! ```
//!
//! Values are fed through the same validation as command-line values.
//! An entry is ignored when the command line supplies the same option, or
//! any option of the same exclusivity group.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::parser::split_packed;
use crate::{OptionKey, OptionSchema, OptionSpec, ParsedOption};

/// Errors that can occur while loading or applying settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Entry names no option.
    #[error("unknown option in settings: {0}")]
    UnknownOption(String),

    /// Entry names an option that only makes sense on the command line.
    #[error("option cannot be stored in settings: {0}")]
    NotPersistable(String),

    /// Entry value has the wrong shape for its option.
    #[error("invalid settings value for {option}: {reason}")]
    InvalidValue { option: String, reason: String },
}

/// Options that control the run itself rather than the conversion.
const COMMAND_LINE_ONLY: [OptionKey; 3] =
    [OptionKey::Help, OptionKey::Version, OptionKey::LoadSettings];

/// Stored option values, keyed by long option name.
///
/// # Examples
///
/// ```
/// use supconv_core::*;
///
/// let settings = Settings::new().with("resolution", "pal").with("delay", 10);
/// let schema = OptionSchema::standard();
/// let config = Parser::new(&schema)
///     .parse_with_settings(&["--resolution", "720p"], &settings)
///     .unwrap();
///
/// assert_eq!(config.resolution().lines(), Some(720));
/// assert_eq!(config.delay_ms(), 10.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    entries: BTreeMap<String, Value>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SettingsError::IoError) if the file cannot be
    /// read, or [`YamlError`](SettingsError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parses settings from YAML text. Blank text yields empty settings.
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Adds or replaces an entry.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.entries.insert(name.to_string(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves every entry against `schema`.
    ///
    /// Entries that switch a flag off (`false`) or are `null` are dropped.
    ///
    /// # Errors
    ///
    /// Fails on unknown option names, command-line-only options and values
    /// of the wrong shape.
    pub fn to_parsed(&self, schema: &OptionSchema) -> Result<Vec<ParsedOption>, SettingsError> {
        let mut parsed = Vec::new();
        for (name, value) in &self.entries {
            let spec = schema
                .find_long(name)
                .ok_or_else(|| SettingsError::UnknownOption(name.clone()))?;
            if COMMAND_LINE_ONLY.contains(&spec.key) {
                return Err(SettingsError::NotPersistable(name.clone()));
            }
            if let Some(values) = raw_values(spec, value)? {
                parsed.push(ParsedOption::new(spec, values));
            }
        }
        Ok(parsed)
    }

    /// Entries that survive command-line precedence.
    ///
    /// `explicit` holds the keys given on the command line.
    pub fn overrides(
        &self,
        schema: &OptionSchema,
        explicit: &BTreeSet<OptionKey>,
    ) -> Result<Vec<ParsedOption>, SettingsError> {
        let mut kept = Vec::new();
        for option in self.to_parsed(schema)? {
            let shadowed = explicit.contains(&option.key)
                || schema
                    .group_of(option.key)
                    .is_some_and(|group| group.members.iter().any(|m| explicit.contains(m)));
            if shadowed {
                debug!(option = %option.name, "command line overrides stored setting");
                continue;
            }
            debug!(option = %option.name, values = ?option.values, "applying stored setting");
            kept.push(option);
        }
        Ok(kept)
    }
}

fn invalid(spec: &OptionSpec, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        option: spec.display_name(),
        reason: reason.to_string(),
    }
}

fn scalar(spec: &OptionSpec, value: &Value) -> Result<String, SettingsError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(invalid(spec, "expected a string or a number")),
    }
}

fn raw_values(spec: &OptionSpec, value: &Value) -> Result<Option<Vec<String>>, SettingsError> {
    if value.is_null() {
        return Ok(None);
    }

    if spec.is_flag() {
        return match value {
            Value::Bool(true) => Ok(Some(Vec::new())),
            Value::Bool(false) => Ok(None),
            _ => Err(invalid(spec, "expected true or false")),
        };
    }

    match value {
        Value::Sequence(items) => {
            if items.is_empty() || items.len() > spec.arity {
                return Err(invalid(spec, &format!("expected 1 to {} values", spec.arity)));
            }
            let values = items
                .iter()
                .map(|item| scalar(spec, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(values))
        }
        other => Ok(Some(split_packed(spec, &scalar(spec, other)?))),
    }
}
