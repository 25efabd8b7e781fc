mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::info;
use mapbank_core::{BatchWriter, MapRecord, Orchestrator, RoguelikeGenerator, Settings};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Batch-generate validated ASCII dungeon maps.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file; built-in defaults apply when the default path is absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the built-in generator, overriding `generator.seed`
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Output directory, overriding `paths.raw`
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Search room bounds for a fixed map size and room count
    Search {
        map_size: usize,
        room_count_ideal: usize,
        map_count: usize,
    },
    /// Generate maps from the `small` and `large` size profiles
    Profiles { small_count: usize, large_count: usize },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = load_settings(&cli)?;
    let records = produce(&cli.command, &settings)?;

    let writer = BatchWriter::from_settings(&settings);
    writer
        .prepare(settings.paths.clean)
        .with_context(|| format!("Failed to prepare {}", writer.output_dir().display()))?;
    let report = writer
        .write(&records)
        .with_context(|| format!("Failed to create {}", writer.output_dir().display()))?;

    println!("Generated {} maps.", records.len());
    println!("Wrote {} batch files to {}", report.written.len(), writer.output_dir().display());
    if !report.is_complete() {
        for failure in &report.failed {
            eprintln!(
                "Batch {} not written ({}): {}",
                failure.index,
                failure.path.display(),
                failure.error
            );
        }
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => read_settings(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            read_settings(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => Settings::default(),
    };

    if let Some(seed) = cli.seed {
        settings.generator.seed = seed;
    }
    if let Some(output) = &cli.output {
        settings.paths.raw = output.clone();
    }
    Ok(settings)
}

fn read_settings(path: &Path) -> Result<Settings> {
    Settings::load(path).with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn produce(command: &Command, settings: &Settings) -> Result<Vec<MapRecord>> {
    let generator = RoguelikeGenerator::new(settings.generator.seed);
    let mut orchestrator = Orchestrator::new(generator, settings);

    match *command {
        Command::Search { map_size, room_count_ideal, map_count } => {
            info!("generating {map_count} maps of size {map_size} with {room_count_ideal} rooms");
            let production = orchestrator
                .produce(map_size, room_count_ideal, map_count)
                .context("Invalid map request")?;
            Ok(production.records)
        }
        Command::Profiles { small_count, large_count } => {
            let mut records = Vec::with_capacity(small_count + large_count);
            for (label, count) in [("small", small_count), ("large", large_count)] {
                if count == 0 {
                    continue;
                }
                let profile = settings.profile(label)?;
                info!("generating {count} {label} maps");
                let production = orchestrator
                    .produce_profile(label, profile, count)
                    .with_context(|| format!("Invalid [sizes.{label}] profile"))?;
                records.extend(production.records);
            }
            Ok(records)
        }
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::*;

    #[test]
    fn search_takes_three_positional_arguments() {
        let cli = Cli::try_parse_from(["mapbank", "search", "20", "4", "100"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Search { map_size: 20, room_count_ideal: 4, map_count: 100 }
        );
    }

    #[test]
    fn missing_positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["mapbank", "search", "20", "4"]).is_err());
        assert!(Cli::try_parse_from(["mapbank", "profiles", "10"]).is_err());
        assert!(Cli::try_parse_from(["mapbank"]).is_err());
    }

    #[test]
    fn global_overrides_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mapbank", "profiles", "3", "1", "--seed", "9", "--output", "out", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        let settings = load_settings(&Cli { config: None, ..cli }).unwrap();
        assert_eq!(settings.generator.seed, 9);
        assert_eq!(settings.paths.raw, PathBuf::from("out"));
    }

    #[test]
    fn missing_explicit_config_is_fatal() {
        let cli = Cli::try_parse_from([
            "mapbank", "search", "20", "4", "1", "--config", "does/not/exist.toml",
        ])
        .unwrap();
        assert!(load_settings(&cli).is_err());
    }

    #[test]
    fn profiles_require_configured_categories() {
        let command = Command::Profiles { small_count: 1, large_count: 0 };
        let err = produce(&command, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("sizes.small"), "{err}");
    }

    #[test]
    fn profiles_that_produce_nothing_still_succeed() {
        let settings = Settings::from_toml_str(
            r#"
            [limits]
            accept_attempt_ceiling = 1
            max_errors = 0

            [sizes.small]
            map_min = 8
            map_max = 8
            room_min = 3
            room_max = 3
            room_ideal = 50
            retry = 5
            "#,
        )
        .unwrap();
        let command = Command::Profiles { small_count: 2, large_count: 0 };
        assert!(produce(&command, &settings).unwrap().is_empty());
    }

    #[test]
    fn oversized_search_map_is_an_invalid_request() {
        let command = Command::Search { map_size: usize::MAX, room_count_ideal: 4, map_count: 1 };
        let err = produce(&command, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid map request"), "{err}");
    }

    #[test]
    fn verbosity_maps_to_log_levels() {
        assert_eq!(logging::level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(logging::level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(logging::level_for_verbosity(5), LevelFilter::Trace);
    }
}
