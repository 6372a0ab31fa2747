//! Option table validation.
//!
//! Catches structural defects in an option table before it is used for
//! parsing: colliding names, malformed names, multi-value options without a
//! separator, and display orders that do not cover the table.
//!
//! These are defects in the table definition, not user errors.
//!
//! # Examples
//!
//! ```
//! use supconv_core::*;
//!
//! let specs = vec![
//!     OptionSpec::flag(OptionKey::Help, 'h', "help"),
//!     OptionSpec::flag(OptionKey::Verbose, 'v', "verbose"),
//! ];
//! assert!(validate_specs(&specs, &[OptionKey::Help, OptionKey::Verbose]).is_empty());
//!
//! // Two options on the same short code
//! let specs = vec![
//!     OptionSpec::flag(OptionKey::Help, 'h', "help"),
//!     OptionSpec::flag(OptionKey::Verbose, 'h', "verbose"),
//! ];
//! let errors = validate_specs(&specs, &[OptionKey::Help, OptionKey::Verbose]);
//! assert_eq!(errors, vec![SchemaError::DuplicateShort('h')]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{OptionKey, OptionSpec};

/// Option table definition errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two specs share a short code.
    #[error("duplicate short option: -{0}")]
    DuplicateShort(char),
    /// Two specs share a long name.
    #[error("duplicate long option: --{0}")]
    DuplicateLong(String),
    /// Two specs share an option key.
    #[error("option key registered twice: {0:?}")]
    DuplicateKey(OptionKey),
    /// Short code is not an ASCII letter or digit.
    #[error("invalid short option code: {0:?}")]
    InvalidShortCode(char),
    /// Long name is empty, starts with a dash or contains whitespace.
    #[error("invalid long option name: {0:?}")]
    InvalidLongName(String),
    /// Option takes more than one value but declares no separator.
    #[error("option --{0} takes several values but has no separator")]
    MissingSeparator(String),
    /// A zero-arity option declares value settings (separator, optional
    /// argument, default or example).
    #[error("flag --{0} cannot declare value settings")]
    FlagWithValueSettings(String),
    /// A default value is declared on an option whose values are required.
    #[error("option --{0} declares a default but its argument is required")]
    DefaultWithoutOptionalArg(String),
    /// Display order lists a key that is not registered.
    #[error("display order names unregistered option {0:?}")]
    UnknownInDisplayOrder(OptionKey),
    /// Display order omits or repeats a registered key.
    #[error("display order must list every option exactly once; {0:?} is wrong")]
    BadDisplayOrder(OptionKey),
}

/// Validates a table of specs together with its display order.
///
/// Returns every defect found, in table order followed by display-order
/// defects; an empty vector means the table is sound.
pub fn validate_specs(specs: &[OptionSpec], display_order: &[OptionKey]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut keys = HashSet::new();
    let mut shorts = HashSet::new();
    let mut longs = HashSet::new();

    for spec in specs {
        if !keys.insert(spec.key) {
            errors.push(SchemaError::DuplicateKey(spec.key));
        }

        if !spec.short.is_ascii_alphanumeric() {
            errors.push(SchemaError::InvalidShortCode(spec.short));
        } else if !shorts.insert(spec.short) {
            errors.push(SchemaError::DuplicateShort(spec.short));
        }

        let long = spec.long.as_str();
        if long.is_empty() || long.starts_with('-') || long.chars().any(char::is_whitespace) {
            errors.push(SchemaError::InvalidLongName(long.to_string()));
        } else if !longs.insert(long) {
            errors.push(SchemaError::DuplicateLong(long.to_string()));
        }

        errors.extend(validate_arity(spec));
    }

    errors.extend(validate_display_order(&keys, display_order));
    errors
}

fn validate_arity(spec: &OptionSpec) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if spec.is_flag() {
        if spec.separator.is_some()
            || spec.optional_arg
            || spec.default_value.is_some()
            || spec.example.is_some()
        {
            errors.push(SchemaError::FlagWithValueSettings(spec.long.clone()));
        }
        return errors;
    }

    if spec.arity > 1 && spec.separator.is_none() {
        errors.push(SchemaError::MissingSeparator(spec.long.clone()));
    }

    if spec.default_value.is_some() && !spec.optional_arg {
        errors.push(SchemaError::DefaultWithoutOptionalArg(spec.long.clone()));
    }

    errors
}

fn validate_display_order(
    registered: &HashSet<OptionKey>,
    display_order: &[OptionKey],
) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for key in display_order {
        if !registered.contains(key) {
            errors.push(SchemaError::UnknownInDisplayOrder(*key));
        } else if !seen.insert(*key) {
            errors.push(SchemaError::BadDisplayOrder(*key));
        }
    }

    // Registered keys that were never placed, in key order.
    let mut missing: Vec<OptionKey> = registered.difference(&seen).copied().collect();
    missing.sort();
    errors.extend(missing.into_iter().map(SchemaError::BadDisplayOrder));

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(specs: &[OptionSpec]) -> Vec<OptionKey> {
        specs.iter().map(|s| s.key).collect()
    }

    #[test]
    fn test_rejects_duplicate_long_name() {
        let specs = vec![
            OptionSpec::flag(OptionKey::Help, 'h', "help"),
            OptionSpec::flag(OptionKey::Version, 'V', "help"),
        ];

        let errors = validate_specs(&specs, &order(&specs));
        assert_eq!(errors, vec![SchemaError::DuplicateLong("help".to_string())]);
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let specs = vec![
            OptionSpec::flag(OptionKey::Help, 'h', "help"),
            OptionSpec::flag(OptionKey::Help, 'u', "usage"),
        ];

        let errors = validate_specs(&specs, &[OptionKey::Help]);
        assert_eq!(errors, vec![SchemaError::DuplicateKey(OptionKey::Help)]);
    }

    #[test]
    fn test_rejects_bad_names() {
        let specs = vec![OptionSpec::flag(OptionKey::Help, '-', "help")];
        assert_eq!(
            validate_specs(&specs, &order(&specs)),
            vec![SchemaError::InvalidShortCode('-')]
        );

        let specs = vec![OptionSpec::flag(OptionKey::Help, 'h', "--help")];
        assert_eq!(
            validate_specs(&specs, &order(&specs)),
            vec![SchemaError::InvalidLongName("--help".to_string())]
        );
    }

    #[test]
    fn test_rejects_pair_without_separator() {
        let mut scale = OptionSpec::pair(OptionKey::Scale, 'S', "scale", "x,y", ',');
        scale.separator = None;
        let specs = vec![scale];

        let errors = validate_specs(&specs, &order(&specs));
        assert_eq!(errors, vec![SchemaError::MissingSeparator("scale".to_string())]);
    }

    #[test]
    fn test_rejects_flag_with_value_settings() {
        let mut swap = OptionSpec::flag(OptionKey::Swap, 'w', "swap");
        swap.optional_arg = true;
        let specs = vec![swap];

        let errors = validate_specs(&specs, &order(&specs));
        assert_eq!(
            errors,
            vec![SchemaError::FlagWithValueSettings("swap".to_string())]
        );
    }

    #[test]
    fn test_rejects_default_on_required_argument() {
        let mut delay = OptionSpec::single(OptionKey::Delay, 'd', "delay", "delay");
        delay.default_value = Some("0".to_string());
        let specs = vec![delay];

        let errors = validate_specs(&specs, &order(&specs));
        assert_eq!(
            errors,
            vec![SchemaError::DefaultWithoutOptionalArg("delay".to_string())]
        );
    }

    #[test]
    fn test_rejects_incomplete_display_order() {
        let specs = vec![
            OptionSpec::flag(OptionKey::Help, 'h', "help"),
            OptionSpec::flag(OptionKey::Version, 'V', "version"),
        ];

        let errors = validate_specs(&specs, &[OptionKey::Version]);
        assert_eq!(errors, vec![SchemaError::BadDisplayOrder(OptionKey::Help)]);

        let errors = validate_specs(
            &specs,
            &[OptionKey::Help, OptionKey::Version, OptionKey::Swap],
        );
        assert_eq!(
            errors,
            vec![SchemaError::UnknownInDisplayOrder(OptionKey::Swap)]
        );
    }

    #[test]
    fn test_reports_every_defect() {
        let mut scale = OptionSpec::pair(OptionKey::Scale, 'S', "scale", "x,y", ',');
        scale.separator = None;
        scale.default_value = Some("1,1".to_string());
        let specs = vec![
            OptionSpec::flag(OptionKey::Help, 'h', "help"),
            OptionSpec::flag(OptionKey::Version, 'h', "help"),
            scale,
        ];

        let errors = validate_specs(&specs, &[OptionKey::Help, OptionKey::Help]);
        assert_eq!(
            errors,
            vec![
                SchemaError::DuplicateShort('h'),
                SchemaError::DuplicateLong("help".to_string()),
                SchemaError::MissingSeparator("scale".to_string()),
                SchemaError::DefaultWithoutOptionalArg("scale".to_string()),
                SchemaError::BadDisplayOrder(OptionKey::Help),
                SchemaError::BadDisplayOrder(OptionKey::Version),
                SchemaError::BadDisplayOrder(OptionKey::Scale),
            ]
        );
    }

    #[test]
    fn test_accepts_display_order_differing_from_registration() {
        let specs = vec![
            OptionSpec::flag(OptionKey::Help, 'h', "help"),
            OptionSpec::flag(OptionKey::Version, 'V', "version"),
        ];

        let errors = validate_specs(&specs, &[OptionKey::Version, OptionKey::Help]);
        assert!(errors.is_empty());
    }
}
