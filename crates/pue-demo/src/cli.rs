#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args by hand and supports `PUE_DEMO_*` environment overrides.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
pue demo: a checkbox and a counter kept in sync with two cells

USAGE:
    pue-demo [OPTIONS]

OPTIONS:
    --ticks=N            Number of timer ticks to run (default: 5)
    --interval-ms=N      Delay between ticks in milliseconds (default: 1000)
    --relisten=BOOL      Re-install text input listeners on every change
                         (default: true)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    PUE_DEMO_TICKS           Override --ticks
    PUE_DEMO_INTERVAL_MS     Override --interval-ms
    PUE_MAX_NOTIFY_DEPTH     Nested write limit per cell (default: 100)
    PUE_RELISTEN_ON_CHANGE   Default for --relisten
    RUST_LOG                 Log filter, e.g. pue_dom=debug";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Timer ticks to run before exiting.
    pub ticks: u32,
    /// Delay between ticks.
    pub interval_ms: u64,
    /// Overrides `PUE_RELISTEN_ON_CHANGE` when set.
    pub relisten: Option<bool>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            ticks: 5,
            interval_ms: 1000,
            relisten: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

fn parse_bool(val: &str) -> Option<bool> {
    match val {
        "1" => Some(true),
        "0" => Some(false),
        v if v.eq_ignore_ascii_case("true") => Some(true),
        v if v.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or a malformed flag.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("pue-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage.");
                process::exit(1);
            }
        }
    }

    /// Environment variables take precedence over defaults but are
    /// overridden by explicit flags.
    pub fn parse_from(
        args: &[String],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, String> {
        let mut opts = Self::default();

        if let Some(val) = lookup("PUE_DEMO_TICKS")
            && let Ok(n) = val.parse()
        {
            opts.ticks = n;
        }
        if let Some(val) = lookup("PUE_DEMO_INTERVAL_MS")
            && let Ok(n) = val.parse()
        {
            opts.interval_ms = n;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--ticks=") {
                        opts.ticks = val
                            .parse()
                            .map_err(|_| format!("Invalid --ticks value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--interval-ms=") {
                        opts.interval_ms = val
                            .parse()
                            .map_err(|_| format!("Invalid --interval-ms value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--relisten=") {
                        opts.relisten = Some(
                            parse_bool(val)
                                .ok_or_else(|| format!("Invalid --relisten value: {val}"))?,
                        );
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}
