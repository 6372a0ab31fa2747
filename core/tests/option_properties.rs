use std::io::Write;

use supconv_core::coerce::{parse_double, parse_int};
use supconv_core::values::{FrameRateSync, HorizontalPosition, Resolution, SourceFps};
use supconv_core::*;

fn parse(args: &[&str]) -> Result<Configuration> {
    let schema = OptionSchema::standard();
    Parser::new(&schema).parse(args)
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

#[test]
fn every_group_pair_conflicts() {
    let schema = OptionSchema::standard();
    let parser = Parser::new(&schema);

    for group in schema.groups() {
        for a in &group.members {
            for b in group.members.iter().filter(|b| *b != a) {
                let a = schema.get(*a).unwrap();
                let b = schema.get(*b).unwrap();
                let mut args = vec![a.display_name()];
                args.extend(a.example.clone());
                args.push(b.display_name());
                args.extend(b.example.clone());

                let err = parser.parse(&args).unwrap_err();
                let Error::Parse(ParseError::MutuallyExclusive { first, second }) = &err else {
                    panic!("{args:?} gave {err:?}");
                };
                assert_eq!(*first, a.display_name());
                assert_eq!(*second, b.display_name());
            }
        }
    }
}

#[test]
fn scale_values() {
    let config = parse(&["--scale", "2.0,1.5"]).unwrap();
    assert_eq!((config.scale().x, config.scale().y), (2.0, 1.5));

    let err = parse(&["--scale"]).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::MissingArgument { expected: 2, found: 0, .. })
    ));
}

#[test]
fn moves_are_exclusive() {
    let err = parse(&["--move-in", "16:9,10", "--move-out", "4:3,5"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "--move-in and --move-out are mutually exclusive"
    );
}

#[test]
fn resolution_with_target_fps() {
    let config = parse(&["--resolution", "1080p", "--fps-target", "24p"]).unwrap();
    assert_eq!(config.resolution(), Resolution::Hd1080);
    assert_eq!(config.resolution().lines(), Some(1080));
    assert_eq!(config.target_fps(), Some(23.976));
}

#[test]
fn unrecognized_token() {
    let err = parse(&["--frobnicate"]).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::UnrecognizedOption(ref token)) if token == "--frobnicate"
    ));
}

#[test]
fn convert_fps_with_auto_source() {
    let config = parse(&["-C", "auto", "30p"]).unwrap();
    assert_eq!(
        config.frame_rate(),
        FrameRateSync::Convert {
            source: SourceFps::Auto,
            target: 29.97
        }
    );
    assert_eq!(config.target_fps(), Some(29.97));
}

#[test]
fn horizontal_move_forms() {
    let config = parse(&["--move-x", "left,-10"]).unwrap();
    let moved = config.horizontal_move().into_option().unwrap();
    assert_eq!(moved.position, HorizontalPosition::Left);
    assert_eq!(moved.offset, -10);

    let config = parse(&["--move-x"]).unwrap();
    let moved = config.horizontal_move().into_option().unwrap();
    assert_eq!(moved.position, HorizontalPosition::Center);

    assert!(matches!(
        parse(&["--move-x", "center,5"]),
        Err(Error::Validation(ValidationError::MalformedPair { .. }))
    ));
}

#[test]
fn negative_one_is_a_value() {
    assert_eq!(parse(&["--delay", "-1"]).unwrap().delay_ms(), -1.0);
    assert!(matches!(
        parse(&["--delay", "x"]),
        Err(Error::Validation(ValidationError::NotANumber { .. }))
    ));
}

// ---------------------------------------------------------------------------
// Coercion and optional values
// ---------------------------------------------------------------------------

#[test]
fn sentinel_coercion() {
    assert_eq!(parse_int("42"), 42);
    assert_eq!(parse_int(" 42 "), 42);
    assert_eq!(parse_int("abc"), -1);
    assert_eq!(parse_int(""), -1);
    assert_eq!(parse_double("3.14"), 3.14);
    assert_eq!(parse_double("x"), -1.0);
}

#[test]
fn optional_value_identity() {
    assert_eq!(OptionalValue::<String>::absent(), OptionalValue::absent());
    assert_eq!(
        OptionalValue::of("x".to_string()).unwrap(),
        OptionalValue::of("x".to_string()).unwrap()
    );
    assert_eq!(OptionalValue::of(String::new()), Err(EmptyPayload));
    assert_eq!(OptionalValue::<Option<u8>>::of(None), Err(EmptyPayload));
}

// ---------------------------------------------------------------------------
// Usage and settings
// ---------------------------------------------------------------------------

#[test]
fn usage_examples_reparse() {
    let schema = OptionSchema::standard();
    let parser = Parser::new(&schema);
    let usage = render_usage(&schema, "supconv");

    for spec in schema.display_order() {
        assert!(usage.contains(&synopsis(spec)), "missing {}", spec.long);
        let mut args = vec![spec.display_name()];
        args.extend(spec.example.clone());
        parser
            .parse(&args)
            .unwrap_or_else(|err| panic!("{args:?} failed: {err}"));
    }
}

#[test]
fn settings_file_underneath_command_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "resolution: pal\ndelay: 10\nmove-out: \"2.35,-5\"").unwrap();
    let settings = Settings::load(file.path()).unwrap();

    let schema = OptionSchema::standard();
    let config = Parser::new(&schema)
        .parse_with_settings(&["--resolution", "720p", "--move-in", "16:9,0"], &settings)
        .unwrap();

    assert_eq!(config.resolution().lines(), Some(720));
    assert_eq!(config.delay_ms(), 10.0);
    assert!(config.is_explicit(OptionKey::MoveIn));
    assert!(!config.is_explicit(OptionKey::Delay));

    let serialized = serde_json::to_value(&config).unwrap();
    assert_eq!(serialized["caption_move"]["direction"], "inside");
}

#[test]
fn missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::load(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, SettingsError::IoError(_)));
}
