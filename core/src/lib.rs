//! Command-line option engine for the supconv subtitle converter.
//!
//! This crate turns an argument vector into a validated, typed
//! [`Configuration`]:
//!
//! - [`OptionSchema`]: the option table with short codes, long names, argument
//!   arity, separators, descriptions and the canonical display order.
//! - [`OptionGroup`]: sets of options that may not be combined, such as
//!   `--fps-target` and `--convert-fps`.
//! - [`Parser`]: tokenizes arguments against a schema, enforces
//!   exclusivity and builds the configuration.
//! - [`Settings`]: stored option values merged underneath the command line.
//! - [`OptionalValue`]: an explicit present/absent value used for options
//!   without a meaningful default.
//!
//! Numeric helpers with sentinel fallbacks live in [`coerce`]; typed option
//! values live in [`values`].
//!
//! # Example
//!
//! ```
//! use supconv_core::*;
//! use supconv_core::values::Resolution;
//!
//! let schema = OptionSchema::standard();
//! let parser = Parser::new(&schema);
//!
//! let config = parser
//!     .parse(&["-r", "720p", "--scale", "1.0,1.2", "--delay", "-200"])
//!     .unwrap();
//! assert_eq!(config.resolution(), Resolution::Hd720);
//! assert_eq!(config.scale().y, 1.2);
//! assert_eq!(config.delay_ms(), -200.0);
//!
//! let err = parser.parse(&["--move-in", "16:9,0", "--move-out", "2.35,0"]);
//! assert!(matches!(err, Err(Error::Parse(ParseError::MutuallyExclusive { .. }))));
//! ```

pub mod coerce;
mod config;
mod error;
mod optional;
mod parser;
mod schema;
mod settings;
mod types;
mod usage;
mod validate;
pub mod values;

pub use config::{
    Configuration, DEFAULT_ALPHA_CROP, DEFAULT_ALPHA_THRESHOLD, DEFAULT_LANGUAGE,
    DEFAULT_MERGE_TIME_MS, DEFAULT_MIN_DISPLAY_TIME_MS,
};
pub use error::{Error, ParseError, Result, ValidationError};
pub use optional::{AbsentValue, EmptyPayload, Nullable, OptionalValue};
pub use parser::Parser;
pub use schema::{
    FRAME_RATE_GROUP, MOVE_GROUP, OptionSchema, STANDARD_DISPLAY_ORDER, standard_specs,
};
pub use settings::{Settings, SettingsError};
pub use types::*;
pub use usage::{documented_examples, render_usage, synopsis};
pub use validate::{SchemaError, validate_specs};
