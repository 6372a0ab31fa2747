//! Option table type definitions.
//!
//! An [`OptionSpec`] describes one command-line option: its short and long
//! names, how many values it consumes, how a packed value is split, and
//! whether the values may be omitted. Specs are plain data; the
//! [`OptionSchema`](crate::OptionSchema) indexes them and the
//! [`Parser`](crate::Parser) consumes them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of every option the converter understands.
///
/// The schema maps short codes and long names onto these keys, so renaming an
/// option in the table never changes how its value is validated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKey {
    Help,
    Version,
    Output,
    Verbose,
    LoadSettings,
    Resolution,
    FpsTarget,
    ConvertFps,
    Delay,
    Filter,
    PaletteMode,
    MinimumTime,
    MergeTime,
    MoveIn,
    MoveOut,
    MoveX,
    CropY,
    AlphaCrop,
    Scale,
    ExportPalette,
    ForcedOnly,
    ForceAll,
    Swap,
    FixInvisible,
    AlphaThreshold,
    LumLowMedThreshold,
    LumMedHighThreshold,
    Language,
    PaletteFile,
}

/// Name of a mutual-exclusivity group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Schema entry for one option.
///
/// Use the constructors [`flag`](OptionSpec::flag),
/// [`single`](OptionSpec::single) and [`pair`](OptionSpec::pair), then chain
/// builder methods.
///
/// # Examples
///
/// ```
/// use supconv_core::{OptionKey, OptionSpec};
///
/// let scale = OptionSpec::pair(OptionKey::Scale, 'S', "scale", "x,y", ',')
///     .with_description("Scale captions horizontally and vertically.")
///     .with_example("2.0,1.5");
/// assert_eq!(scale.arity, 2);
/// assert_eq!(scale.separator, Some(','));
/// assert_eq!(scale.display_name(), "--scale");
///
/// let verbose = OptionSpec::flag(OptionKey::Verbose, 'v', "verbose");
/// assert!(verbose.is_flag());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    /// Identity used for validation and configuration assembly.
    pub key: OptionKey,
    /// Short code, used as `-c`.
    pub short: char,
    /// Long name without leading dashes, used as `--name`.
    pub long: String,
    /// Help text; may span several lines.
    pub description: String,
    /// Placeholder shown in usage text, e.g. `<fps>`.
    pub arg_name: Option<String>,
    /// Number of values consumed: 0 for flags.
    pub arity: usize,
    /// Separator that packs several values into one token.
    pub separator: Option<char>,
    /// Whether the values may be omitted entirely.
    pub optional_arg: bool,
    /// Raw value applied when an optional-argument option is given bare.
    pub default_value: Option<String>,
    /// Documented example value, shown in usage text.
    pub example: Option<String>,
    /// Mutual-exclusivity group, if any.
    pub group: Option<GroupId>,
}

impl OptionSpec {
    fn new(key: OptionKey, short: char, long: &str, arity: usize) -> Self {
        Self {
            key,
            short,
            long: long.to_string(),
            description: String::new(),
            arg_name: None,
            arity,
            separator: None,
            optional_arg: false,
            default_value: None,
            example: None,
            group: None,
        }
    }

    /// Creates an option that takes no value.
    pub fn flag(key: OptionKey, short: char, long: &str) -> Self {
        Self::new(key, short, long, 0)
    }

    /// Creates an option that takes exactly one value.
    pub fn single(key: OptionKey, short: char, long: &str, arg_name: &str) -> Self {
        let mut spec = Self::new(key, short, long, 1);
        spec.arg_name = Some(arg_name.to_string());
        spec
    }

    /// Creates an option that takes two values, packed with `separator` or
    /// given as two tokens.
    pub fn pair(key: OptionKey, short: char, long: &str, arg_name: &str, separator: char) -> Self {
        let mut spec = Self::new(key, short, long, 2);
        spec.arg_name = Some(arg_name.to_string());
        spec.separator = Some(separator);
        spec
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Adds a documented example value.
    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }

    /// Places the option in a mutual-exclusivity group.
    pub fn in_group(mut self, group: &GroupId) -> Self {
        self.group = Some(group.clone());
        self
    }

    /// Lets the values be omitted; `default` is applied when they are.
    pub fn optional_argument(mut self, default: Option<&str>) -> Self {
        self.optional_arg = true;
        self.default_value = default.map(String::from);
        self
    }

    /// Returns `true` for zero-arity options.
    pub fn is_flag(&self) -> bool {
        self.arity == 0
    }

    /// Long form including dashes, used in diagnostics.
    pub fn display_name(&self) -> String {
        format!("--{}", self.long)
    }

    /// Checks whether `token` names this option in short or long form.
    ///
    /// ```
    /// use supconv_core::{OptionKey, OptionSpec};
    ///
    /// let spec = OptionSpec::single(OptionKey::Delay, 'd', "delay", "delay");
    /// assert!(spec.matches("-d"));
    /// assert!(spec.matches("--delay"));
    /// assert!(!spec.matches("-delay"));
    /// ```
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return long == self.long;
        }
        let mut chars = token.chars();
        chars.next() == Some('-') && chars.next() == Some(self.short) && chars.next().is_none()
    }
}

/// Options of which at most one may be supplied per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    pub id: GroupId,
    /// Members in registration order.
    pub members: Vec<OptionKey>,
}

impl OptionGroup {
    pub fn contains(&self, key: OptionKey) -> bool {
        self.members.contains(&key)
    }
}

/// One option occurrence resolved by the scanner.
///
/// `values` holds zero values (flags, or a bare optional-argument option
/// without a default), one value, or `arity` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    pub key: OptionKey,
    /// Long form with dashes, kept for diagnostics.
    pub name: String,
    pub values: Vec<String>,
}

impl ParsedOption {
    pub fn new(spec: &OptionSpec, values: Vec<String>) -> Self {
        Self {
            key: spec.key,
            name: spec.display_name(),
            values,
        }
    }
}
