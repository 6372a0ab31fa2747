//! The option table.
//!
//! [`OptionSchema`] owns every [`OptionSpec`], indexes them by short code,
//! long name and key, derives the mutual-exclusivity groups from the specs,
//! and remembers the canonical display order used for usage text.
//!
//! The schema is built once and only read afterwards. It is passed to the
//! [`Parser`](crate::Parser) explicitly, so tests can parse against a
//! reduced or altered table.
//!
//! # Examples
//!
//! ```
//! use supconv_core::*;
//!
//! let schema = OptionSchema::standard();
//! assert_eq!(schema.find_short('S').unwrap().long, "scale");
//! assert_eq!(schema.find_long("fps-target").unwrap().key, OptionKey::FpsTarget);
//! assert_eq!(schema.display_order().next().unwrap().key, OptionKey::Help);
//! ```

use std::collections::HashMap;

use crate::validate::{SchemaError, validate_specs};
use crate::{GroupId, OptionGroup, OptionKey, OptionSpec};

/// Group holding `fps-target` and `convert-fps`.
pub const FRAME_RATE_GROUP: &str = "frame-rate";
/// Group holding `move-in` and `move-out`.
pub const MOVE_GROUP: &str = "move";

/// Immutable, indexed table of option specs.
#[derive(Debug, Clone)]
pub struct OptionSchema {
    specs: Vec<OptionSpec>,
    groups: Vec<OptionGroup>,
    display_order: Vec<usize>,
    by_short: HashMap<char, usize>,
    by_long: HashMap<String, usize>,
    by_key: HashMap<OptionKey, usize>,
}

impl OptionSchema {
    /// Builds a schema from specs and a canonical display order.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found by
    /// [`validate_specs`](crate::validate_specs).
    pub fn new(specs: Vec<OptionSpec>, display_order: &[OptionKey]) -> Result<Self, SchemaError> {
        if let Some(err) = validate_specs(&specs, display_order).into_iter().next() {
            return Err(err);
        }

        let mut by_short = HashMap::new();
        let mut by_long = HashMap::new();
        let mut by_key = HashMap::new();
        let mut groups: Vec<OptionGroup> = Vec::new();

        for (idx, spec) in specs.iter().enumerate() {
            by_short.insert(spec.short, idx);
            by_long.insert(spec.long.clone(), idx);
            by_key.insert(spec.key, idx);

            if let Some(id) = &spec.group {
                match groups.iter_mut().find(|g| &g.id == id) {
                    Some(group) => group.members.push(spec.key),
                    None => groups.push(OptionGroup {
                        id: id.clone(),
                        members: vec![spec.key],
                    }),
                }
            }
        }

        let display_order = display_order.iter().map(|key| by_key[key]).collect();

        Ok(Self {
            specs,
            groups,
            display_order,
            by_short,
            by_long,
            by_key,
        })
    }

    /// Builds the supconv option table.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table is inconsistent, which is a defect in
    /// this crate rather than a user error.
    pub fn standard() -> Self {
        Self::new(standard_specs(), &STANDARD_DISPLAY_ORDER)
            .expect("built-in option table must be consistent")
    }

    /// Finds a spec by short code.
    pub fn find_short(&self, short: char) -> Option<&OptionSpec> {
        self.by_short.get(&short).map(|&idx| &self.specs[idx])
    }

    /// Finds a spec by long name (without dashes).
    pub fn find_long(&self, long: &str) -> Option<&OptionSpec> {
        self.by_long.get(long).map(|&idx| &self.specs[idx])
    }

    /// Finds a spec by key.
    pub fn get(&self, key: OptionKey) -> Option<&OptionSpec> {
        self.by_key.get(&key).map(|&idx| &self.specs[idx])
    }

    /// Resolves a command-line token (`-c` or `--name`) to a spec.
    ///
    /// Anything else, including `-` and `--`, resolves to `None`.
    ///
    /// ```
    /// use supconv_core::OptionSchema;
    ///
    /// let schema = OptionSchema::standard();
    /// assert!(schema.resolve("-r").is_some());
    /// assert!(schema.resolve("--resolution").is_some());
    /// assert!(schema.resolve("-10").is_none());
    /// assert!(schema.resolve("resolution").is_none());
    /// ```
    pub fn resolve(&self, token: &str) -> Option<&OptionSpec> {
        if let Some(long) = token.strip_prefix("--") {
            return self.find_long(long);
        }
        let rest = token.strip_prefix('-')?;
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(short), None) => self.find_short(short),
            _ => None,
        }
    }

    /// Specs in registration order.
    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// Specs in canonical display order.
    pub fn display_order(&self) -> impl Iterator<Item = &OptionSpec> {
        self.display_order.iter().map(|&idx| &self.specs[idx])
    }

    /// Mutual-exclusivity groups, in order of first registration.
    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    /// Returns the group containing `key`, if any.
    pub fn group_of(&self, key: OptionKey) -> Option<&OptionGroup> {
        self.groups.iter().find(|g| g.contains(key))
    }
}

/// Canonical help order of the supconv table.
pub const STANDARD_DISPLAY_ORDER: [OptionKey; 29] = [
    OptionKey::Help,
    OptionKey::LoadSettings,
    OptionKey::Resolution,
    OptionKey::FpsTarget,
    OptionKey::ConvertFps,
    OptionKey::Delay,
    OptionKey::Filter,
    OptionKey::PaletteMode,
    OptionKey::MinimumTime,
    OptionKey::MergeTime,
    OptionKey::MoveIn,
    OptionKey::MoveOut,
    OptionKey::MoveX,
    OptionKey::CropY,
    OptionKey::AlphaCrop,
    OptionKey::Scale,
    OptionKey::ExportPalette,
    OptionKey::ForcedOnly,
    OptionKey::ForceAll,
    OptionKey::Swap,
    OptionKey::FixInvisible,
    OptionKey::AlphaThreshold,
    OptionKey::LumLowMedThreshold,
    OptionKey::LumMedHighThreshold,
    OptionKey::Language,
    OptionKey::PaletteFile,
    OptionKey::Output,
    OptionKey::Verbose,
    OptionKey::Version,
];

/// Specs of the supconv table, in registration order.
pub fn standard_specs() -> Vec<OptionSpec> {
    let frame_rate = GroupId::new(FRAME_RATE_GROUP);
    let moves = GroupId::new(MOVE_GROUP);

    vec![
        OptionSpec::flag(OptionKey::Help, 'h', "help")
            .with_description("Show usage information and exit."),
        OptionSpec::flag(OptionKey::Version, 'V', "version")
            .with_description("Show version information and exit."),
        OptionSpec::single(OptionKey::Output, 'o', "output", "filename")
            .with_description("Specify output file.")
            .with_example("movie.sub"),
        OptionSpec::flag(OptionKey::Verbose, 'v', "verbose")
            .with_description("Verbose console output mode."),
        OptionSpec::flag(OptionKey::LoadSettings, 'L', "load-settings").with_description(
            "Load the stored settings file even in command-line mode.\n\
             Values given on the command line take precedence.",
        ),
        OptionSpec::single(OptionKey::Resolution, 'r', "resolution", "resolution")
            .with_description(
                "Set resolution to: keep, ntsc=480, pal=576, 720p=720, 1080p=1080, 1440x1080\n\
                 Default: keep",
            )
            .with_example("1080p"),
        OptionSpec::single(OptionKey::FpsTarget, 'T', "fps-target", "fps")
            .with_description(
                "Synchronize target frame rate to <fps>.\n\
                 Predefined values: 24p=23.976, pal or 25p=25, ntsc or 30p=29.97, keep\n\
                 Default: automatic",
            )
            .with_example("24p")
            .in_group(&frame_rate),
        OptionSpec::pair(OptionKey::ConvertFps, 'C', "convert-fps", "src,trg", ',')
            .with_description(
                "Convert frame rate from <src> to <trg>.\n\
                 Supported values: 24p=23.976, 25p=25, 30p=29.97\n\
                 auto,<trg> detects the source frame rate.",
            )
            .with_example("auto,25p")
            .in_group(&frame_rate),
        OptionSpec::single(OptionKey::Delay, 'd', "delay", "delay")
            .with_description("Set delay in ms.\nDefault: 0.0")
            .with_example("-200"),
        OptionSpec::single(OptionKey::Filter, 'f', "filter", "filter")
            .with_description(
                "Set the filter to use for scaling.\n\
                 Supported values: bilinear, triangle, bicubic, bell, b-spline, hermite, lanczos3, mitchell\n\
                 Default: bilinear",
            )
            .with_example("lanczos3"),
        OptionSpec::single(OptionKey::PaletteMode, 'p', "palette-mode", "mode")
            .with_description("Set palette mode.\nSupported values: keep, create, dither\nDefault: create")
            .with_example("dither"),
        OptionSpec::single(OptionKey::MinimumTime, 'm', "minimum-time", "time")
            .with_description("Set minimum display time in ms.\nDefault: 500")
            .with_example("600"),
        OptionSpec::single(OptionKey::MergeTime, 'x', "merge-time", "time")
            .with_description("Set maximum time difference for merging subtitles in ms.\nDefault: 200")
            .with_example("150"),
        OptionSpec::pair(OptionKey::MoveIn, 'I', "move-in", "ratio,offset", ',')
            .with_description("Move captions inside screen ratio <ratio>, +/- offset <offset>.")
            .with_example("16:9,10")
            .in_group(&moves),
        OptionSpec::pair(OptionKey::MoveOut, 'O', "move-out", "ratio,offset", ',')
            .with_description("Move captions outside screen ratio <ratio>, +/- offset <offset>.")
            .with_example("2.35,-5")
            .in_group(&moves),
        OptionSpec::pair(OptionKey::MoveX, 'X', "move-x", "pos[,offset]", ',')
            .with_description(
                "Move captions horizontally from the given position: left, right, center.\n\
                 +/- optional offset <offset> (only when moving left or right)",
            )
            .with_example("left,-10")
            .optional_argument(Some("center")),
        OptionSpec::single(OptionKey::CropY, 'c', "crop-y", "n")
            .with_description("Crop the upper/lower n lines.\nDefault: 0")
            .with_example("20"),
        OptionSpec::single(OptionKey::AlphaCrop, 'a', "alpha-crop", "n")
            .with_description("Set the alpha cropping threshold.\nDefault: 10")
            .with_example("14"),
        OptionSpec::pair(OptionKey::Scale, 'S', "scale", "x,y", ',')
            .with_description("Scale captions horizontally and vertically.\nDefault: 1.0,1.0")
            .with_example("2.0,1.5"),
        OptionSpec::flag(OptionKey::ExportPalette, 'P', "export-palette")
            .with_description("Export target palette in PGCEdit format."),
        OptionSpec::flag(OptionKey::ForcedOnly, 'D', "forced-only")
            .with_description("Export only forced subtitles (when converting from BD-SUP)."),
        OptionSpec::single(OptionKey::ForceAll, 'F', "force-all", "state")
            .with_description("Set or clear the forced flag for all subtitles.\nSupported values: set, clear")
            .with_example("set"),
        OptionSpec::flag(OptionKey::Swap, 'w', "swap")
            .with_description("Swap Cr/Cb components when loading a BD/HD-DVD sup file."),
        OptionSpec::flag(OptionKey::FixInvisible, 'i', "fix-invisible")
            .with_description("Fix zero alpha frame palette for SUB/IDX and SUP/IFO."),
        OptionSpec::single(OptionKey::AlphaThreshold, 'A', "alpha-threshold", "n")
            .with_description("Set alpha threshold 0..255 for SUB/IDX conversion.\nDefault: 80")
            .with_example("96"),
        OptionSpec::single(OptionKey::LumLowMedThreshold, 'M', "lum-low-med-threshold", "n")
            .with_description("Set luminance lo/med threshold 0..255 for SUB/IDX conversion.\nDefault: auto")
            .with_example("100"),
        OptionSpec::single(OptionKey::LumMedHighThreshold, 'H', "lum-med-high-threshold", "n")
            .with_description("Set luminance med/hi threshold 0..255 for SUB/IDX conversion.\nDefault: auto")
            .with_example("auto"),
        OptionSpec::single(OptionKey::Language, 'l', "language", "language")
            .with_description("Set language for SUB/IDX export.\nDefault: en")
            .with_example("de"),
        OptionSpec::single(OptionKey::PaletteFile, 't', "palette-file", "file")
            .with_description("Load palette file for SUB/IDX conversion. Overrides default palette.")
            .with_example("custom.pal"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schema_builds() {
        let schema = OptionSchema::standard();
        assert_eq!(schema.specs().len(), 29);
        assert_eq!(schema.display_order().count(), 29);
    }

    #[test]
    fn test_display_order_differs_from_registration() {
        let schema = OptionSchema::standard();
        let registered: Vec<_> = schema.specs().iter().map(|s| s.key).collect();
        let displayed: Vec<_> = schema.display_order().map(|s| s.key).collect();

        assert_ne!(registered, displayed);
        assert_eq!(displayed.last(), Some(&OptionKey::Version));
    }

    #[test]
    fn test_groups_are_derived_from_specs() {
        let schema = OptionSchema::standard();
        assert_eq!(schema.groups().len(), 2);

        let frame_rate = schema.group_of(OptionKey::ConvertFps).unwrap();
        assert_eq!(frame_rate.id, GroupId::new(FRAME_RATE_GROUP));
        assert_eq!(
            frame_rate.members,
            vec![OptionKey::FpsTarget, OptionKey::ConvertFps]
        );

        let moves = schema.group_of(OptionKey::MoveOut).unwrap();
        assert!(moves.contains(OptionKey::MoveIn));
        assert!(schema.group_of(OptionKey::MoveX).is_none());
    }

    #[test]
    fn test_resolve_tokens() {
        let schema = OptionSchema::standard();

        assert_eq!(schema.resolve("-X").unwrap().key, OptionKey::MoveX);
        assert_eq!(schema.resolve("--move-x").unwrap().key, OptionKey::MoveX);
        assert!(schema.resolve("-").is_none());
        assert!(schema.resolve("--").is_none());
        assert!(schema.resolve("-1").is_none());
        assert!(schema.resolve("--frobnicate").is_none());
    }

    #[test]
    fn test_new_rejects_collision() {
        let mut specs = standard_specs();
        specs.push(OptionSpec::flag(OptionKey::Help, 'q', "quiet"));

        let err = OptionSchema::new(specs, &STANDARD_DISPLAY_ORDER).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateKey(OptionKey::Help));
    }

    #[test]
    fn test_reduced_schema() {
        let specs = vec![
            OptionSpec::flag(OptionKey::Help, 'h', "help"),
            OptionSpec::single(OptionKey::Delay, 'd', "delay", "delay"),
        ];
        let schema = OptionSchema::new(specs, &[OptionKey::Delay, OptionKey::Help]).unwrap();

        assert!(schema.find_long("scale").is_none());
        assert_eq!(schema.display_order().next().unwrap().key, OptionKey::Delay);
        assert!(schema.groups().is_empty());
    }
}
