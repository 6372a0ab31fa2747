//! Typed option values.
//!
//! Each enumerated option has a small Rust enum here, together with the
//! tokens accepted on the command line. Frame-rate presets map symbolic
//! names such as `24p` or `pal` onto fixed rates.

use serde::Serialize;

/// 23.976 fps, the film rate.
pub const FPS_24P: f64 = 23.976;
/// 25 fps, PAL.
pub const FPS_PAL: f64 = 25.0;
/// 29.97 fps, NTSC.
pub const FPS_NTSC: f64 = 29.97;

/// Maps a preset frame-rate token to its rate.
///
/// ```
/// use supconv_core::values::fps_preset;
///
/// assert_eq!(fps_preset("24p"), Some(23.976));
/// assert_eq!(fps_preset("PAL"), Some(25.0));
/// assert_eq!(fps_preset("48p"), None);
/// ```
pub fn fps_preset(token: &str) -> Option<f64> {
    match token.trim().to_ascii_lowercase().as_str() {
        "24p" => Some(FPS_24P),
        "pal" | "25p" => Some(FPS_PAL),
        "ntsc" | "30p" => Some(FPS_NTSC),
        _ => None,
    }
}

/// Enumerations parsed from a fixed set of tokens.
///
/// Matching trims the token and ignores ASCII case. Several tokens may map
/// to one variant.
pub trait NamedValue: Copy + 'static {
    /// Accepted tokens, lowercase.
    const NAMES: &'static [(&'static str, Self)];

    fn lookup(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, value)| *value)
    }

    /// Accepted tokens as a comma-separated list, for diagnostics.
    fn expected() -> String {
        Self::NAMES
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// Keep the source resolution.
    #[default]
    Keep,
    /// 720x480.
    Ntsc,
    /// 720x576.
    Pal,
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Hd1080,
    /// Anamorphic 1080 lines.
    #[serde(rename = "1440x1080")]
    Hd1440x1080,
}

impl Resolution {
    /// Vertical resolution in lines; `None` for [`Resolution::Keep`].
    pub fn lines(self) -> Option<u32> {
        match self {
            Resolution::Keep => None,
            Resolution::Ntsc => Some(480),
            Resolution::Pal => Some(576),
            Resolution::Hd720 => Some(720),
            Resolution::Hd1080 | Resolution::Hd1440x1080 => Some(1080),
        }
    }

    /// Horizontal resolution in pixels; `None` for [`Resolution::Keep`].
    pub fn width(self) -> Option<u32> {
        match self {
            Resolution::Keep => None,
            Resolution::Ntsc | Resolution::Pal => Some(720),
            Resolution::Hd720 => Some(1280),
            Resolution::Hd1080 => Some(1920),
            Resolution::Hd1440x1080 => Some(1440),
        }
    }
}

impl NamedValue for Resolution {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("keep", Resolution::Keep),
        ("ntsc", Resolution::Ntsc),
        ("480", Resolution::Ntsc),
        ("pal", Resolution::Pal),
        ("576", Resolution::Pal),
        ("720p", Resolution::Hd720),
        ("720", Resolution::Hd720),
        ("1080p", Resolution::Hd1080),
        ("1080", Resolution::Hd1080),
        ("1440x1080", Resolution::Hd1440x1080),
    ];
}

/// Value of `--fps-target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFps {
    /// Preserve the source rate.
    Keep,
    Fps(f64),
}

/// Source side of `--convert-fps`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFps {
    /// Detect the source rate.
    Auto,
    Fps(f64),
}

impl SourceFps {
    pub const NAMES: [&'static str; 4] = ["auto", "24p", "25p", "30p"];

    pub fn lookup(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(SourceFps::Auto),
            "24p" => Some(SourceFps::Fps(FPS_24P)),
            "25p" => Some(SourceFps::Fps(FPS_PAL)),
            "30p" => Some(SourceFps::Fps(FPS_NTSC)),
            _ => None,
        }
    }
}

/// How subtitle timing is resynchronized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameRateSync {
    /// Nothing requested; the pipeline decides.
    #[default]
    Auto,
    /// Synchronize to a target rate (`--fps-target`).
    Target(TargetFps),
    /// Convert between two rates (`--convert-fps`).
    Convert { source: SourceFps, target: f64 },
}

/// Direction of `--move-in` / `--move-out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveDirection {
    Inside,
    Outside,
}

/// Vertical caption move relative to a screen ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaptionMove {
    pub direction: MoveDirection,
    /// Screen aspect ratio, e.g. 1.777 for 16:9.
    pub ratio: f64,
    /// Additional offset in lines.
    pub offset: i32,
}

/// Anchor of `--move-x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalPosition {
    Left,
    Right,
    #[default]
    Center,
}

impl NamedValue for HorizontalPosition {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("left", HorizontalPosition::Left),
        ("right", HorizontalPosition::Right),
        ("center", HorizontalPosition::Center),
    ];
}

/// Horizontal caption move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HorizontalMove {
    pub position: HorizontalPosition,
    /// Offset in pixels; always 0 for [`HorizontalPosition::Center`].
    pub offset: i32,
}

/// Caption scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Value of `--force-all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForcedFlag {
    Set,
    Clear,
}

impl NamedValue for ForcedFlag {
    const NAMES: &'static [(&'static str, Self)] =
        &[("set", ForcedFlag::Set), ("clear", ForcedFlag::Clear)];
}

/// Filter used when scaling caption bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalingFilter {
    #[default]
    Bilinear,
    Triangle,
    Bicubic,
    Bell,
    BSpline,
    Hermite,
    Lanczos3,
    Mitchell,
}

impl NamedValue for ScalingFilter {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("bilinear", ScalingFilter::Bilinear),
        ("triangle", ScalingFilter::Triangle),
        ("bicubic", ScalingFilter::Bicubic),
        ("bell", ScalingFilter::Bell),
        ("b-spline", ScalingFilter::BSpline),
        ("hermite", ScalingFilter::Hermite),
        ("lanczos3", ScalingFilter::Lanczos3),
        ("mitchell", ScalingFilter::Mitchell),
    ];
}

/// How the target palette is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteMode {
    Keep,
    #[default]
    Create,
    Dither,
}

impl NamedValue for PaletteMode {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("keep", PaletteMode::Keep),
        ("create", PaletteMode::Create),
        ("dither", PaletteMode::Dither),
    ];
}

/// Luminance threshold for SUB/IDX conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LuminanceThreshold {
    /// Derived from the source.
    #[default]
    Auto,
    Value(u8),
}
