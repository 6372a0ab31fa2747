//! Validated, typed configuration.
//!
//! [`Configuration::from_parsed`] runs every [`ParsedOption`] through the
//! validator for its key and folds the result into one immutable value.
//! Options that were not supplied keep their documented defaults.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::coerce::{try_parse_double, try_parse_int};
use crate::error::ValidationError;
use crate::values::{
    CaptionMove, ForcedFlag, FrameRateSync, HorizontalMove, HorizontalPosition,
    LuminanceThreshold, MoveDirection, NamedValue, PaletteMode, Resolution, Scale,
    ScalingFilter, SourceFps, TargetFps, fps_preset,
};
use crate::{OptionKey, OptionalValue, ParsedOption};

pub const DEFAULT_MIN_DISPLAY_TIME_MS: f64 = 500.0;
pub const DEFAULT_MERGE_TIME_MS: f64 = 200.0;
pub const DEFAULT_ALPHA_CROP: u32 = 10;
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 80;
pub const DEFAULT_LANGUAGE: &str = "en";

/// Result of a successful parse, handed read-only to the conversion
/// pipeline.
///
/// # Examples
///
/// ```
/// use supconv_core::*;
///
/// let schema = OptionSchema::standard();
/// let config = Parser::new(&schema)
///     .parse(&["--resolution", "1080p", "--fps-target", "24p"])
///     .unwrap();
///
/// assert_eq!(config.resolution().lines(), Some(1080));
/// assert_eq!(config.target_fps(), Some(23.976));
/// assert!(config.is_explicit(OptionKey::Resolution));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    help: bool,
    version: bool,
    verbose: bool,
    load_settings: bool,
    output: OptionalValue<String>,
    resolution: Resolution,
    frame_rate: FrameRateSync,
    delay_ms: f64,
    filter: ScalingFilter,
    palette_mode: PaletteMode,
    min_display_time_ms: f64,
    merge_time_ms: f64,
    caption_move: OptionalValue<CaptionMove>,
    horizontal_move: OptionalValue<HorizontalMove>,
    crop_y: u32,
    alpha_crop: u32,
    scale: Scale,
    export_palette: bool,
    forced_only: bool,
    forced_flag: OptionalValue<ForcedFlag>,
    swap_cr_cb: bool,
    fix_invisible: bool,
    alpha_threshold: u8,
    lum_low_med_threshold: LuminanceThreshold,
    lum_med_high_threshold: LuminanceThreshold,
    language: String,
    palette_file: OptionalValue<String>,
    explicit: BTreeSet<OptionKey>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            help: false,
            version: false,
            verbose: false,
            load_settings: false,
            output: OptionalValue::absent(),
            resolution: Resolution::default(),
            frame_rate: FrameRateSync::default(),
            delay_ms: 0.0,
            filter: ScalingFilter::default(),
            palette_mode: PaletteMode::default(),
            min_display_time_ms: DEFAULT_MIN_DISPLAY_TIME_MS,
            merge_time_ms: DEFAULT_MERGE_TIME_MS,
            caption_move: OptionalValue::absent(),
            horizontal_move: OptionalValue::absent(),
            crop_y: 0,
            alpha_crop: DEFAULT_ALPHA_CROP,
            scale: Scale::default(),
            export_palette: false,
            forced_only: false,
            forced_flag: OptionalValue::absent(),
            swap_cr_cb: false,
            fix_invisible: false,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            lum_low_med_threshold: LuminanceThreshold::default(),
            lum_med_high_threshold: LuminanceThreshold::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            palette_file: OptionalValue::absent(),
            explicit: BTreeSet::new(),
        }
    }
}

impl Configuration {
    /// Validates parsed options and assembles a configuration.
    ///
    /// Options are applied in order, so a later entry for the same key wins.
    /// `explicit` records which keys came from the command line.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`]; no partial configuration is
    /// produced.
    pub fn from_parsed(
        parsed: &[ParsedOption],
        explicit: BTreeSet<OptionKey>,
    ) -> Result<Self, ValidationError> {
        let mut config = Self {
            explicit,
            ..Self::default()
        };
        for option in parsed {
            config.apply(option)?;
        }
        Ok(config)
    }

    fn apply(&mut self, option: &ParsedOption) -> Result<(), ValidationError> {
        debug!(option = %option.name, values = ?option.values, "validating option");

        match option.key {
            OptionKey::Help => self.help = true,
            OptionKey::Version => self.version = true,
            OptionKey::Verbose => self.verbose = true,
            OptionKey::LoadSettings => self.load_settings = true,
            OptionKey::ExportPalette => self.export_palette = true,
            OptionKey::ForcedOnly => self.forced_only = true,
            OptionKey::Swap => self.swap_cr_cb = true,
            OptionKey::FixInvisible => self.fix_invisible = true,
            OptionKey::Output => self.output = OptionalValue::Present(non_empty(option)?),
            OptionKey::PaletteFile => {
                self.palette_file = OptionalValue::Present(non_empty(option)?)
            }
            OptionKey::Resolution => self.resolution = named(option, single(option)?)?,
            OptionKey::FpsTarget => self.frame_rate = FrameRateSync::Target(target_fps(option)?),
            OptionKey::ConvertFps => self.frame_rate = convert_fps(option)?,
            OptionKey::Delay => self.delay_ms = number(option, single(option)?)?,
            OptionKey::Filter => self.filter = named(option, single(option)?)?,
            OptionKey::PaletteMode => self.palette_mode = named(option, single(option)?)?,
            OptionKey::MinimumTime => {
                self.min_display_time_ms = non_negative(option, single(option)?)?
            }
            OptionKey::MergeTime => self.merge_time_ms = non_negative(option, single(option)?)?,
            OptionKey::MoveIn => {
                self.caption_move =
                    OptionalValue::Present(caption_move(option, MoveDirection::Inside)?)
            }
            OptionKey::MoveOut => {
                self.caption_move =
                    OptionalValue::Present(caption_move(option, MoveDirection::Outside)?)
            }
            OptionKey::MoveX => {
                self.horizontal_move = OptionalValue::Present(horizontal_move(option)?)
            }
            OptionKey::CropY => self.crop_y = count(option, single(option)?)?,
            OptionKey::AlphaCrop => self.alpha_crop = count(option, single(option)?)?,
            OptionKey::Scale => self.scale = scale(option)?,
            OptionKey::ForceAll => {
                self.forced_flag = OptionalValue::Present(named(option, single(option)?)?)
            }
            OptionKey::AlphaThreshold => self.alpha_threshold = byte(option, single(option)?)?,
            OptionKey::LumLowMedThreshold => self.lum_low_med_threshold = luminance(option)?,
            OptionKey::LumMedHighThreshold => self.lum_med_high_threshold = luminance(option)?,
            OptionKey::Language => self.language = language(option)?,
        }
        Ok(())
    }

    pub fn help(&self) -> bool {
        self.help
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn load_settings(&self) -> bool {
        self.load_settings
    }

    pub fn output(&self) -> &OptionalValue<String> {
        &self.output
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn frame_rate(&self) -> FrameRateSync {
        self.frame_rate
    }

    /// Target frame rate in fps, when one was requested.
    ///
    /// Returns `None` for automatic handling and for `--fps-target keep`.
    pub fn target_fps(&self) -> Option<f64> {
        match self.frame_rate {
            FrameRateSync::Target(TargetFps::Fps(fps)) => Some(fps),
            FrameRateSync::Convert { target, .. } => Some(target),
            FrameRateSync::Target(TargetFps::Keep) | FrameRateSync::Auto => None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn filter(&self) -> ScalingFilter {
        self.filter
    }

    pub fn palette_mode(&self) -> PaletteMode {
        self.palette_mode
    }

    pub fn min_display_time_ms(&self) -> f64 {
        self.min_display_time_ms
    }

    pub fn merge_time_ms(&self) -> f64 {
        self.merge_time_ms
    }

    pub fn caption_move(&self) -> OptionalValue<CaptionMove> {
        self.caption_move
    }

    pub fn horizontal_move(&self) -> OptionalValue<HorizontalMove> {
        self.horizontal_move
    }

    pub fn crop_y(&self) -> u32 {
        self.crop_y
    }

    pub fn alpha_crop(&self) -> u32 {
        self.alpha_crop
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn export_palette(&self) -> bool {
        self.export_palette
    }

    pub fn forced_only(&self) -> bool {
        self.forced_only
    }

    pub fn forced_flag(&self) -> OptionalValue<ForcedFlag> {
        self.forced_flag
    }

    pub fn swap_cr_cb(&self) -> bool {
        self.swap_cr_cb
    }

    pub fn fix_invisible(&self) -> bool {
        self.fix_invisible
    }

    pub fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }

    pub fn lum_low_med_threshold(&self) -> LuminanceThreshold {
        self.lum_low_med_threshold
    }

    pub fn lum_med_high_threshold(&self) -> LuminanceThreshold {
        self.lum_med_high_threshold
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn palette_file(&self) -> &OptionalValue<String> {
        &self.palette_file
    }

    /// Keys supplied on the command line, as opposed to settings or
    /// defaults.
    pub fn explicit_options(&self) -> &BTreeSet<OptionKey> {
        &self.explicit
    }

    pub fn is_explicit(&self, key: OptionKey) -> bool {
        self.explicit.contains(&key)
    }
}

fn single(option: &ParsedOption) -> Result<&str, ValidationError> {
    match option.values.as_slice() {
        [value] => Ok(value.as_str()),
        values => Err(ValidationError::MalformedPair {
            option: option.name.clone(),
            value: values.join(","),
            reason: "expected exactly one value".to_string(),
        }),
    }
}

fn pair(option: &ParsedOption) -> Result<(&str, &str), ValidationError> {
    match option.values.as_slice() {
        [first, second] => Ok((first.as_str(), second.as_str())),
        values => Err(ValidationError::MalformedPair {
            option: option.name.clone(),
            value: values.join(","),
            reason: "expected two values".to_string(),
        }),
    }
}

fn number(option: &ParsedOption, raw: &str) -> Result<f64, ValidationError> {
    try_parse_double(raw).ok_or_else(|| ValidationError::NotANumber {
        option: option.name.clone(),
        value: raw.to_string(),
    })
}

fn integer(option: &ParsedOption, raw: &str) -> Result<i64, ValidationError> {
    try_parse_int(raw).ok_or_else(|| ValidationError::NotANumber {
        option: option.name.clone(),
        value: raw.to_string(),
    })
}

fn out_of_range(option: &ParsedOption, raw: &str, expected: &str) -> ValidationError {
    ValidationError::OutOfRange {
        option: option.name.clone(),
        value: raw.trim().to_string(),
        expected: expected.to_string(),
    }
}

fn non_negative(option: &ParsedOption, raw: &str) -> Result<f64, ValidationError> {
    let value = number(option, raw)?;
    if value < 0.0 {
        return Err(out_of_range(option, raw, "a non-negative number"));
    }
    Ok(value)
}

fn positive(option: &ParsedOption, raw: &str) -> Result<f64, ValidationError> {
    let value = number(option, raw)?;
    if value <= 0.0 {
        return Err(out_of_range(option, raw, "a positive number"));
    }
    Ok(value)
}

fn count(option: &ParsedOption, raw: &str) -> Result<u32, ValidationError> {
    let value = integer(option, raw)?;
    u32::try_from(value).map_err(|_| out_of_range(option, raw, "a non-negative integer"))
}

fn byte(option: &ParsedOption, raw: &str) -> Result<u8, ValidationError> {
    let value = integer(option, raw)?;
    u8::try_from(value).map_err(|_| out_of_range(option, raw, "an integer in 0..=255"))
}

fn offset(option: &ParsedOption, raw: &str) -> Result<i32, ValidationError> {
    let value = integer(option, raw)?;
    i32::try_from(value).map_err(|_| out_of_range(option, raw, "a 32-bit signed integer"))
}

fn named<T: NamedValue>(option: &ParsedOption, raw: &str) -> Result<T, ValidationError> {
    T::lookup(raw).ok_or_else(|| ValidationError::InvalidEnumValue {
        option: option.name.clone(),
        value: raw.to_string(),
        expected: T::expected(),
    })
}

fn non_empty(option: &ParsedOption) -> Result<String, ValidationError> {
    let value = single(option)?;
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyValue {
            option: option.name.clone(),
        });
    }
    Ok(value.to_string())
}

/// Positive number or preset token.
fn frame_rate(option: &ParsedOption, raw: &str) -> Result<f64, ValidationError> {
    match fps_preset(raw) {
        Some(fps) => Ok(fps),
        None => positive(option, raw),
    }
}

fn target_fps(option: &ParsedOption) -> Result<TargetFps, ValidationError> {
    let raw = single(option)?;
    if raw.trim().eq_ignore_ascii_case("keep") {
        return Ok(TargetFps::Keep);
    }
    frame_rate(option, raw).map(TargetFps::Fps)
}

fn convert_fps(option: &ParsedOption) -> Result<FrameRateSync, ValidationError> {
    let (src, trg) = pair(option)?;
    let source = SourceFps::lookup(src).ok_or_else(|| ValidationError::InvalidEnumValue {
        option: option.name.clone(),
        value: src.to_string(),
        expected: SourceFps::NAMES.join(", "),
    })?;
    let target = frame_rate(option, trg)?;
    Ok(FrameRateSync::Convert { source, target })
}

/// Screen ratio as `w:h` or a decimal.
fn screen_ratio(option: &ParsedOption, raw: &str) -> Result<f64, ValidationError> {
    match raw.split_once(':') {
        Some((w, h)) => {
            let w = positive(option, w)?;
            let h = positive(option, h)?;
            Ok(w / h)
        }
        None => positive(option, raw),
    }
}

fn caption_move(
    option: &ParsedOption,
    direction: MoveDirection,
) -> Result<CaptionMove, ValidationError> {
    let (ratio, shift) = pair(option)?;
    Ok(CaptionMove {
        direction,
        ratio: screen_ratio(option, ratio)?,
        offset: offset(option, shift)?,
    })
}

fn horizontal_move(option: &ParsedOption) -> Result<HorizontalMove, ValidationError> {
    match option.values.as_slice() {
        [] => Ok(HorizontalMove::default()),
        [pos] => Ok(HorizontalMove {
            position: named(option, pos)?,
            offset: 0,
        }),
        [pos, shift] => {
            let position: HorizontalPosition = named(option, pos)?;
            if position == HorizontalPosition::Center {
                return Err(ValidationError::MalformedPair {
                    option: option.name.clone(),
                    value: format!("{pos},{shift}"),
                    reason: "an offset is only allowed when moving left or right".to_string(),
                });
            }
            Ok(HorizontalMove {
                position,
                offset: offset(option, shift)?,
            })
        }
        values => Err(ValidationError::MalformedPair {
            option: option.name.clone(),
            value: values.join(","),
            reason: "expected a position and an optional offset".to_string(),
        }),
    }
}

fn scale(option: &ParsedOption) -> Result<Scale, ValidationError> {
    let (x, y) = pair(option)?;
    Ok(Scale {
        x: positive(option, x)?,
        y: positive(option, y)?,
    })
}

fn luminance(option: &ParsedOption) -> Result<LuminanceThreshold, ValidationError> {
    let raw = single(option)?;
    if raw.trim().eq_ignore_ascii_case("auto") {
        return Ok(LuminanceThreshold::Auto);
    }
    byte(option, raw).map(LuminanceThreshold::Value)
}

fn language(option: &ParsedOption) -> Result<String, ValidationError> {
    let raw = single(option)?;
    let code = raw.trim().to_ascii_lowercase();
    if !(2..=3).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidEnumValue {
            option: option.name.clone(),
            value: raw.to_string(),
            expected: "a two or three letter language code".to_string(),
        });
    }
    Ok(code)
}
