//! Pomkit CLI: page-object journeys for the demo sites
//!
//! ## Usage
//!
//! ```bash
//! pomkit locators --site demoblaze   # List registries of one site
//! pomkit config --env stg            # Show the resolved configuration
//! pomkit run --sim                   # Every journey against simulations
//! pomkit run checkout -v             # One live journey (feature `browser`)
//! ```

use clap::Parser;
use pomkit::sites::all_registries;
use pomkit::{EnvKey, NamedLocators, SuiteConfig};
use pomkit_cli::{
    Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs, JourneyRunner,
    LocatorsArgs, OutputFormat, ProgressReporter, RunArgs, RunMode, RunOverrides, Verbosity,
};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Locators(args) => run_locators(&args),
        Commands::Config(args) => run_config(&args),
        Commands::Run(args) => run_journeys(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Log to stderr; `RUST_LOG` overrides the level picked from `-v`/`-q`
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_locators(args: &LocatorsArgs) -> CliResult<()> {
    let registries: Vec<_> = all_registries()
        .into_iter()
        .filter(|(site, _)| args.site.map_or(true, |wanted| wanted.as_str() == *site))
        .collect();

    match OutputFormat::from(args.format) {
        OutputFormat::Json => {
            let listing: Vec<serde_json::Value> = registries
                .iter()
                .map(|(site, registry)| {
                    let locators: Vec<serde_json::Value> = registry
                        .entries()
                        .into_iter()
                        .map(|(name, locator)| {
                            serde_json::json!({
                                "name": name,
                                "selector": locator.selector().to_string(),
                                "description": locator.description(),
                            })
                        })
                        .collect();
                    serde_json::json!({
                        "site": site,
                        "registry": registry.registry_name(),
                        "locators": locators,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            for (site, registry) in &registries {
                println!("{site}/{}", registry.registry_name());
                for (name, locator) in registry.entries() {
                    println!("  {name:<24} {}", locator.selector());
                }
            }
        }
    }
    Ok(())
}

fn resolve_suite_config(file: Option<&Path>, env: Option<&str>) -> CliResult<SuiteConfig> {
    let mut config = SuiteConfig::from_process_env(file)?;
    if let Some(raw) = env {
        config.env = EnvKey::parse_or_default(Some(raw));
    }
    Ok(config)
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let config = resolve_suite_config(args.file.as_deref(), args.env.as_deref())?;
    print!("{}", config.to_redacted_yaml()?);
    Ok(())
}

fn run_journeys(cli_config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let suite = resolve_suite_config(args.file.as_deref(), args.env.as_deref())?;
    let mode = if args.sim {
        RunMode::Simulated
    } else {
        RunMode::Live
    };
    let overrides = RunOverrides {
        artifact_dir: args.artifacts.clone(),
        workers: args.workers,
        fixtures_dir: args.fixtures.clone(),
        headed: args.headed,
    };
    let reporter = ProgressReporter::new(
        cli_config.color.should_color(),
        cli_config.verbosity.is_quiet(),
    );
    let runner = JourneyRunner::new(mode, suite, overrides, reporter);

    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        CliError::config(format!("Failed to create async runtime: {e}"))
    })?;
    let results = rt.block_on(runner.run(&args.journeys));

    if OutputFormat::from(args.format) == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&results.reports)?);
    }
    results.into_result().map(|_| ())
}
