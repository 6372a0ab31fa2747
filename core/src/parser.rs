//! Token scanner and validation driver.
//!
//! The scanner is a two-state machine over the argument tokens:
//!
//! - **expect option**: the token must name an option in the schema;
//! - **expect values**: the pending option still needs values.
//!
//! Everything option-specific (arity, separator, optional argument, default)
//! is read from the [`OptionSpec`], so one routine handles every option.
//! After the scan, exclusivity groups are checked and the result is handed to
//! [`Configuration::from_parsed`].
//!
//! # Examples
//!
//! ```
//! use supconv_core::*;
//!
//! let schema = OptionSchema::standard();
//! let parser = Parser::new(&schema);
//!
//! let parsed = parser.scan(&["-S", "2.0,1.5", "--swap"]).unwrap();
//! assert_eq!(parsed[0].values, vec!["2.0", "1.5"]);
//! assert!(parsed[1].values.is_empty());
//!
//! let err = parser.parse(&["--frobnicate"]).unwrap_err();
//! assert!(matches!(err, Error::Parse(ParseError::UnrecognizedOption(_))));
//! ```

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{ParseError, Result};
use crate::{Configuration, OptionKey, OptionSchema, OptionSpec, ParsedOption, Settings};

/// Splits a packed value on the option's separator.
///
/// A value without the separator is returned as one value. The number of
/// parts is not checked here; a wrong count surfaces as
/// [`MalformedPair`](crate::ValidationError::MalformedPair) once
/// exclusivity groups have been checked.
pub(crate) fn split_packed(spec: &OptionSpec, raw: &str) -> Vec<String> {
    match spec.separator.filter(|sep| raw.contains(*sep)) {
        Some(sep) => raw.split(sep).map(String::from).collect(),
        None => vec![raw.to_string()],
    }
}

enum State<'s> {
    ExpectOption,
    ExpectValues {
        spec: &'s OptionSpec,
        values: Vec<String>,
    },
}

/// Parses argument tokens against an [`OptionSchema`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    schema: &'a OptionSchema,
}

impl<'a> Parser<'a> {
    pub fn new(schema: &'a OptionSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a OptionSchema {
        self.schema
    }

    /// Scans tokens into resolved options.
    ///
    /// When an option is repeated, the last occurrence wins.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnrecognizedOption`] and [`ParseError::MissingArgument`].
    /// Values are kept raw; nothing is validated yet.
    pub fn scan<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<ParsedOption>> {
        let mut parsed: Vec<ParsedOption> = Vec::new();
        let mut state = State::ExpectOption;
        let mut tokens = tokens.iter().map(AsRef::<str>::as_ref).peekable();

        while let Some(&token) = tokens.peek() {
            state = match state {
                State::ExpectOption => {
                    tokens.next();
                    let spec = self
                        .schema
                        .resolve(token)
                        .ok_or_else(|| ParseError::UnrecognizedOption(token.to_string()))?;
                    if spec.is_flag() {
                        record(&mut parsed, ParsedOption::new(spec, Vec::new()));
                        State::ExpectOption
                    } else {
                        State::ExpectValues {
                            spec,
                            values: Vec::new(),
                        }
                    }
                }
                State::ExpectValues { spec, mut values } => {
                    if self.schema.resolve(token).is_some() {
                        // Leave the option token for the next state.
                        record(&mut parsed, finish(spec, values)?);
                        State::ExpectOption
                    } else {
                        tokens.next();
                        let complete = if values.is_empty() {
                            values = split_packed(spec, token);
                            // A packed token carries all of its values.
                            values.len() > 1 || values.len() >= spec.arity
                        } else {
                            values.push(token.to_string());
                            values.len() >= spec.arity
                        };
                        if complete {
                            record(&mut parsed, finish(spec, values)?);
                            State::ExpectOption
                        } else {
                            State::ExpectValues { spec, values }
                        }
                    }
                }
            };
        }

        if let State::ExpectValues { spec, values } = state {
            record(&mut parsed, finish(spec, values)?);
        }

        Ok(parsed)
    }

    /// Fails if two options of one exclusivity group are both present.
    ///
    /// The error names the two options in order of first appearance.
    pub fn check_groups(&self, parsed: &[ParsedOption]) -> std::result::Result<(), ParseError> {
        for group in self.schema.groups() {
            let mut members = parsed.iter().filter(|p| group.contains(p.key));
            if let (Some(first), Some(second)) = (members.next(), members.next()) {
                return Err(ParseError::MutuallyExclusive {
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Checks groups, merges optional settings and validates.
    ///
    /// Options in `parsed` count as given on the command line: they win over
    /// any stored setting for the same option or exclusivity group.
    pub fn assemble(
        &self,
        parsed: Vec<ParsedOption>,
        settings: Option<&Settings>,
    ) -> Result<Configuration> {
        self.check_groups(&parsed)?;
        let explicit: BTreeSet<OptionKey> = parsed.iter().map(|p| p.key).collect();

        let mut merged = match settings {
            Some(settings) => settings.overrides(self.schema, &explicit)?,
            None => Vec::new(),
        };
        merged.extend(parsed);
        self.check_groups(&merged)?;

        Ok(Configuration::from_parsed(&merged, explicit)?)
    }

    /// Scans, checks and validates `tokens`.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Configuration> {
        let parsed = self.scan(tokens)?;
        self.assemble(parsed, None)
    }

    /// Like [`parse`](Self::parse), filling in options the command line
    /// leaves out from `settings`.
    pub fn parse_with_settings<S: AsRef<str>>(
        &self,
        tokens: &[S],
        settings: &Settings,
    ) -> Result<Configuration> {
        let parsed = self.scan(tokens)?;
        self.assemble(parsed, Some(settings))
    }
}

/// Closes a pending option once no more values will arrive.
fn finish(spec: &OptionSpec, values: Vec<String>) -> std::result::Result<ParsedOption, ParseError> {
    if values.is_empty() && spec.optional_arg {
        let values = match &spec.default_value {
            Some(default) => split_packed(spec, default),
            None => Vec::new(),
        };
        debug!(option = %spec.display_name(), ?values, "applying default for bare option");
        return Ok(ParsedOption::new(spec, values));
    }

    let required = if spec.optional_arg { 1 } else { spec.arity };
    if values.len() < required {
        return Err(ParseError::MissingArgument {
            option: spec.display_name(),
            expected: spec.arity,
            found: values.len(),
        });
    }

    debug!(option = %spec.display_name(), ?values, "resolved option");
    Ok(ParsedOption::new(spec, values))
}

fn record(parsed: &mut Vec<ParsedOption>, option: ParsedOption) {
    match parsed.iter_mut().find(|p| p.key == option.key) {
        Some(existing) => {
            warn!(option = %option.name, "option given more than once, keeping the last value");
            *existing = option;
        }
        None => parsed.push(option),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionalValue, ValidationError};
    use crate::values::{HorizontalMove, HorizontalPosition, Scale};

    fn scan(tokens: &[&str]) -> Result<Vec<ParsedOption>> {
        let schema = OptionSchema::standard();
        Parser::new(&schema).scan(tokens)
    }

    fn parse(tokens: &[&str]) -> Result<Configuration> {
        let schema = OptionSchema::standard();
        Parser::new(&schema).parse(tokens)
    }

    #[test]
    fn test_packed_and_separate_pairs_agree() {
        let packed = parse(&["--scale", "2.0,1.5"]).unwrap();
        let separate = parse(&["--scale", "2.0", "1.5"]).unwrap();

        assert_eq!(packed.scale(), Scale { x: 2.0, y: 1.5 });
        assert_eq!(packed.scale(), separate.scale());
    }

    #[test]
    fn test_missing_argument_at_end() {
        let err = scan(&["--scale"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Parse(ParseError::MissingArgument { expected: 2, found: 0, .. })
        ));

        let err = scan(&["--scale", "2.0"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Parse(ParseError::MissingArgument { found: 1, .. })
        ));
    }

    #[test]
    fn test_option_token_is_never_a_value() {
        let err = scan(&["--language", "--swap"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Parse(ParseError::MissingArgument { ref option, .. }) if option == "--language"
        ));
    }

    #[test]
    fn test_negative_numbers_are_values() {
        let config = parse(&["-d", "-1", "--move-x", "left", "-10"]).unwrap();
        assert_eq!(config.delay_ms(), -1.0);
        assert_eq!(
            config.horizontal_move(),
            OptionalValue::Present(HorizontalMove {
                position: HorizontalPosition::Left,
                offset: -10
            })
        );
    }

    #[test]
    fn test_optional_argument_forms() {
        let bare = scan(&["--move-x"]).unwrap();
        assert_eq!(bare[0].values, vec!["center"]);

        let before_option = scan(&["--move-x", "--swap"]).unwrap();
        assert_eq!(before_option[0].values, vec!["center"]);
        assert_eq!(before_option[1].key, OptionKey::Swap);

        let one = scan(&["--move-x", "right", "--swap"]).unwrap();
        assert_eq!(one[0].values, vec!["right"]);

        let packed = scan(&["--move-x", "left,5", "--swap"]).unwrap();
        assert_eq!(packed[0].values, vec!["left", "5"]);
    }

    #[test]
    fn test_packed_value_with_wrong_part_count() {
        let parsed = scan(&["--scale", "1,2,3"]).unwrap();
        assert_eq!(parsed[0].values, vec!["1", "2", "3"]);

        let err = parse(&["--scale", "1,2,3"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Validation(ValidationError::MalformedPair { .. })
        ));

        let err = parse(&["--move-x", "left,1,2"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Validation(ValidationError::MalformedPair { .. })
        ));
    }

    #[test]
    fn test_group_conflict_wins_over_malformed_pair() {
        let err = parse(&["--move-in", "16:9,10,3", "--move-out", "4:3,5"]).unwrap_err();
        match err {
            crate::Error::Parse(ParseError::MutuallyExclusive { first, second }) => {
                assert_eq!(first, "--move-in");
                assert_eq!(second, "--move-out");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_tokens() {
        for token in ["--frobnicate", "-q", "input.sup", "-10"] {
            let err = scan(&[token]).unwrap_err();
            assert!(
                matches!(err, crate::Error::Parse(ParseError::UnrecognizedOption(ref t)) if t == token),
                "token {token}"
            );
        }
    }

    #[test]
    fn test_mutually_exclusive_groups() {
        let err = parse(&["--move-in", "16:9,10", "--move-out", "4:3,5"]).unwrap_err();
        match err {
            crate::Error::Parse(ParseError::MutuallyExclusive { first, second }) => {
                assert_eq!(first, "--move-in");
                assert_eq!(second, "--move-out");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse(&["-C", "auto,25p", "-T", "24p"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Parse(ParseError::MutuallyExclusive { .. })
        ));
    }

    #[test]
    fn test_group_conflict_reported_before_validation() {
        let err = parse(&["--fps-target", "bogus", "--convert-fps", "auto,25p"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Parse(ParseError::MutuallyExclusive { .. })
        ));
    }

    #[test]
    fn test_repeated_option_last_wins() {
        let config = parse(&["--delay", "10", "--delay", "20"]).unwrap();
        assert_eq!(config.delay_ms(), 20.0);

        let parsed = scan(&["--delay", "10", "--swap", "--delay", "20"]).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].key, OptionKey::Delay);
        assert_eq!(parsed[0].values, vec!["20"]);
    }

    #[test]
    fn test_repeated_option_keeps_first_position_in_conflicts() {
        let err = parse(&[
            "--move-in", "16:9,1", "--move-out", "4:3,2", "--move-in", "2.35,3",
        ])
        .unwrap_err();
        match err {
            crate::Error::Parse(ParseError::MutuallyExclusive { first, second }) => {
                assert_eq!(first, "--move-in");
                assert_eq!(second, "--move-out");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolution_and_fps_target() {
        let config = parse(&["--resolution", "1080p", "--fps-target", "24p"]).unwrap();
        assert_eq!(config.resolution().lines(), Some(1080));
        assert_eq!(config.target_fps(), Some(23.976));
    }

    #[test]
    fn test_settings_fill_gaps_only() {
        let schema = OptionSchema::standard();
        let settings = Settings::new()
            .with("resolution", "pal")
            .with("delay", 10)
            .with("fps-target", "pal");

        let config = Parser::new(&schema)
            .parse_with_settings(&["--resolution", "720p", "-C", "auto,24p"], &settings)
            .unwrap();

        assert_eq!(config.resolution().lines(), Some(720));
        assert_eq!(config.delay_ms(), 10.0);
        assert_eq!(config.target_fps(), Some(23.976));
        assert!(config.is_explicit(OptionKey::Resolution));
        assert!(!config.is_explicit(OptionKey::Delay));
    }

    #[test]
    fn test_conflicting_settings_are_rejected() {
        let schema = OptionSchema::standard();
        let settings = Settings::new()
            .with("move-in", "16:9,10")
            .with("move-out", "4:3,5");

        let err = Parser::new(&schema)
            .parse_with_settings(&["--swap"], &settings)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Parse(ParseError::MutuallyExclusive { .. })
        ));
    }

    #[test]
    fn test_alternate_schema() {
        let specs = vec![
            OptionSpec::flag(OptionKey::Swap, 's', "swap"),
            OptionSpec::single(OptionKey::Delay, 'd', "delay", "ms")
                .in_group(&crate::GroupId::new("timing")),
            OptionSpec::single(OptionKey::MergeTime, 'm', "merge", "ms")
                .in_group(&crate::GroupId::new("timing")),
        ];
        let schema = OptionSchema::new(
            specs,
            &[OptionKey::Swap, OptionKey::Delay, OptionKey::MergeTime],
        )
        .unwrap();
        let parser = Parser::new(&schema);

        let config = parser.parse(&["-s", "--merge", "50"]).unwrap();
        assert!(config.swap_cr_cb());
        assert_eq!(config.merge_time_ms(), 50.0);

        let err = parser.parse(&["-d", "1", "-m", "2"]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Parse(ParseError::MutuallyExclusive { .. })
        ));

        // Not in this schema.
        assert!(parser.parse(&["--scale", "1,1"]).is_err());
    }
}
