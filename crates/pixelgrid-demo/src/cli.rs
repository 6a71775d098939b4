#![forbid(unsafe_code)]

//! Command-line argument parsing for the terminal demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `PIXELGRID_DEMO_*` prefix; explicit flags win.

use std::env;
use std::path::PathBuf;
use std::process;

use pixelgrid::{Bloom, DEFAULT_PRESET};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
PixelGrid Demo: a live 3x3 choreography in your terminal

USAGE:
    pixelgrid-demo [OPTIONS]

OPTIONS:
    --animation=NAME     Start on preset NAME (default: wave-lr)
    --bloom[=N]          Enable glow, optionally with blur amount N (default: 4)
    --catalog=FILE       Load presets from a JSON file instead of the built-ins
    --list               Print preset names and exit
    --exit-after-ms=N    Quit automatically after N milliseconds
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    n / Right       Next preset
    p / Left        Previous preset
    Space           Play / stop
    b               Toggle glow
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    PIXELGRID_DEMO_ANIMATION      Override --animation
    PIXELGRID_DEMO_BLOOM          Override --bloom (number, or empty for default)
    PIXELGRID_DEMO_CATALOG        Override --catalog
    PIXELGRID_DEMO_EXIT_AFTER_MS  Override --exit-after-ms
    PIXELGRID_REDUCED_MOTION      Show all cells steadily (1|true|yes|on)
    PIXELGRID_LOG                 Log filter; logs go to pixelgrid-demo.log";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Initial preset name.
    pub animation: String,
    /// Initial glow.
    pub bloom: Bloom,
    /// Custom catalog file.
    pub catalog: Option<PathBuf>,
    /// Print names and exit.
    pub list: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            animation: DEFAULT_PRESET.into(),
            bloom: Bloom::Off,
            catalog: None,
            list: false,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or bad input.
    pub fn parse() -> Self {
        let args = env::args().skip(1);
        match Self::parse_from(args, |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("pixelgrid-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from explicit inputs.
    pub fn parse_from<I, E>(args: I, env_var: E) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment defaults first
        if let Some(val) = env_var("PIXELGRID_DEMO_ANIMATION") {
            opts.animation = val;
        }
        if let Some(val) = env_var("PIXELGRID_DEMO_BLOOM")
            && let Some(bloom) = parse_bloom(&val)
        {
            opts.bloom = bloom;
        }
        if let Some(val) = env_var("PIXELGRID_DEMO_CATALOG") {
            opts.catalog = Some(PathBuf::from(val));
        }
        if let Some(val) = env_var("PIXELGRID_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        // Command-line args override env vars
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--list" => opts.list = true,
                "--bloom" => opts.bloom = Bloom::Default,
                other => {
                    if let Some(val) = other.strip_prefix("--animation=") {
                        opts.animation = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--bloom=") {
                        opts.bloom = parse_bloom(val)
                            .ok_or_else(|| format!("Invalid --bloom value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--catalog=") {
                        opts.catalog = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = val
                            .parse()
                            .map_err(|_| format!("Invalid --exit-after-ms value: {val}"))?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }
}

/// Empty means the default glow; otherwise a non-negative number.
fn parse_bloom(val: &str) -> Option<Bloom> {
    if val.is_empty() {
        return Some(Bloom::Default);
    }
    match val.parse::<f32>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Some(Bloom::Amount(amount)),
        _ => None,
    }
}
