use std::path::PathBuf;

use supconv_core::{OptionKey, OptionSchema, ParsedOption, Parser, Settings, render_usage};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROGRAM: &str = "supconv";

/// Environment variable overriding the settings file location.
const SETTINGS_ENV: &str = "SUPCONV_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "supconv.yml";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    init_tracing(args.iter().any(|arg| arg == "-v" || arg == "--verbose"));

    let schema = OptionSchema::standard();
    if let Err(err) = run(&schema, &args) {
        eprintln!("error: {err}");
        eprintln!();
        eprint!("{}", render_usage(&schema, PROGRAM));
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(schema: &OptionSchema, args: &[String]) -> Result<(), String> {
    let parser = Parser::new(schema);
    let parsed = parser.scan(args).map_err(|err| err.to_string())?;

    if has(&parsed, OptionKey::Help) {
        print!("{}", render_usage(schema, PROGRAM));
        return Ok(());
    }
    if has(&parsed, OptionKey::Version) {
        println!("{PROGRAM} {PACKAGE_VERSION}");
        return Ok(());
    }

    let settings = if has(&parsed, OptionKey::LoadSettings) {
        Some(load_settings()?)
    } else {
        None
    };

    let config = parser
        .assemble(parsed, settings.as_ref())
        .map_err(|err| err.to_string())?;

    let json = serde_json::to_string_pretty(&config)
        .map_err(|err| format!("Failed to serialize configuration: {err}"))?;
    println!("{json}");
    Ok(())
}

fn has(parsed: &[ParsedOption], key: OptionKey) -> bool {
    parsed.iter().any(|option| option.key == key)
}

fn settings_path() -> PathBuf {
    std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

fn load_settings() -> Result<Settings, String> {
    let path = settings_path();
    debug!(path = %path.display(), "loading settings");
    Settings::load(&path)
        .map_err(|err| format!("Failed to load settings '{}': {err}", path.display()))
}
