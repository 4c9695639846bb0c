//! CLI command definitions using clap

use crate::journeys::Journey;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pomkit: page objects and locators for browser end-to-end tests
#[derive(Parser, Debug)]
#[command(name = "pomkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the locator registries of every page object
    Locators(LocatorsArgs),

    /// Show the resolved suite configuration
    Config(ConfigArgs),

    /// Run the built-in demo-site journeys
    Run(RunArgs),
}

/// Arguments for the locators command
#[derive(Parser, Debug)]
pub struct LocatorsArgs {
    /// Only list registries of this site
    #[arg(short, long)]
    pub site: Option<SiteArg>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML configuration file layered under environment variables
    #[arg(short, long, env = "POMKIT_CONFIG")]
    pub file: Option<PathBuf>,

    /// Environment key (dev, stg, prod), overriding TEST_ENV
    #[arg(short, long)]
    pub env: Option<String>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Journeys to run (all when omitted)
    #[arg(value_enum)]
    pub journeys: Vec<Journey>,

    /// Run against the in-memory site simulations instead of a browser
    #[arg(long)]
    pub sim: bool,

    /// YAML configuration file layered under environment variables
    #[arg(short, long, env = "POMKIT_CONFIG")]
    pub file: Option<PathBuf>,

    /// Environment key (dev, stg, prod), overriding TEST_ENV
    #[arg(short, long)]
    pub env: Option<String>,

    /// Directory for screenshots, overriding ARTIFACT_DIR
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Number of journeys run at once, overriding WORKERS
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Fixture directory with env-keyed journey data, overriding FIXTURES_DIR
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Demo site selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiteArg {
    /// E-commerce demo
    Demoblaze,
    /// Widget showcase
    Demoqa,
    /// Shopping demo
    Saucedemo,
}

impl SiteArg {
    /// Site key used in registry listings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Demoblaze => "demoblaze",
            Self::Demoqa => "demoqa",
            Self::Saucedemo => "saucedemo",
        }
    }
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
