//! Pomkit CLI Library
//!
//! Command-line front end for the pomkit page-object layer: registry
//! listings, configuration inspection and the built-in journeys.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod journeys;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, FormatArg, LocatorsArgs, RunArgs, SiteArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use journeys::Journey;
pub use output::{journey_line, OutputFormat, ProgressReporter};
pub use runner::{JourneyResults, JourneyRunner, RunMode, RunOverrides};
