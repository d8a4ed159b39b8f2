//! manifest-yml - XML manifest to manifest.yml converter
//!
//! Main entry point for the manifest-yml CLI.

use clap::{Parser, Subcommand};
use manifest_yml::batch::{discover_manifests, BatchConverter, BatchReport};
use manifest_yml::config::{ConverterConfig, EmitOptions, EmptyCollections, TrialConfig};
use manifest_yml::prompt::Prompter;
use manifest_yml::{style, ConvertError};
use std::path::{Path, PathBuf};
use std::process;

/// manifest-yml - Convert XML package manifests into manifest.yml files
#[derive(Parser, Debug)]
#[command(name = "manifest-yml")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/manifest-yml/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Trial allowance as an ISO 8601 duration (default: PT1H)
    #[arg(long, global = true, env = "MANIFEST_YML_TRIAL_ALLOWANCE")]
    allowance: Option<String>,

    /// Trial window as an ISO 8601 duration (default: P7D)
    #[arg(long, global = true, env = "MANIFEST_YML_TRIAL_WINDOW")]
    window: Option<String>,

    /// Empty collection policy (legacy, always, omit)
    #[arg(long, global = true)]
    empty_collections: Option<String>,

    /// Fail on values containing line breaks instead of writing them verbatim
    #[arg(long, global = true)]
    strict: bool,

    /// Never prompt; use flags, config and defaults only
    #[arg(long, global = true)]
    no_prompt: bool,

    /// Output the run report in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable verbose/debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every *.xml manifest below a directory (the default)
    Batch {
        /// Directory to search (prompted for when omitted)
        dir: Option<PathBuf>,

        /// Convert without writing any files
        #[arg(long)]
        dry_run: bool,

        /// Also print each converted manifest to stdout
        #[arg(long)]
        stdout: bool,
    },

    /// Convert a single manifest and print the result
    Convert {
        /// XML manifest file
        file: PathBuf,
    },

    /// Write a config file with the built-in defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Settings resolved from flags, config file and prompts
struct Settings {
    trial: TrialConfig,
    options: EmitOptions,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = manifest_yml::logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every file converted
fn run(cli: Cli) -> manifest_yml::Result<bool> {
    let interactive = !cli.no_prompt && Prompter::is_interactive();

    match cli.command {
        Some(Commands::Init { force }) => {
            handle_init_command(cli.config.as_deref(), force)?;
            Ok(true)
        }
        Some(Commands::Convert { ref file }) => {
            let config = load_config(&cli)?;
            let settings = resolve_settings(&cli, &config, false)?;
            let converter =
                BatchConverter::new(settings.trial, settings.options).with_dry_run(true);
            let conversion = converter.convert_file(file)?;
            print!("{}", conversion.yaml);
            Ok(true)
        }
        Some(Commands::Batch {
            ref dir,
            dry_run,
            stdout,
        }) => {
            let config = load_config(&cli)?;
            let dir = match dir {
                Some(dir) => dir.clone(),
                None => prompt_directory(interactive)?,
            };
            run_batch(&cli, &config, &dir, dry_run, stdout, interactive)
        }
        None => {
            let config = load_config(&cli)?;
            let dir = prompt_directory(interactive)?;
            run_batch(&cli, &config, &dir, false, false, interactive)
        }
    }
}

fn load_config(cli: &Cli) -> manifest_yml::Result<ConverterConfig> {
    let config = match cli.config {
        Some(ref path) => ConverterConfig::load(path)?,
        None => ConverterConfig::load_default()?,
    };
    tracing::debug!(?config, "Configuration in effect");
    Ok(config)
}

fn prompt_directory(interactive: bool) -> manifest_yml::Result<PathBuf> {
    if !interactive {
        return Err(ConvertError::Config(
            "No directory given. Pass one with 'manifest-yml batch <dir>'.".to_string(),
        ));
    }
    Prompter::new().directory()
}

fn run_batch(
    cli: &Cli,
    config: &ConverterConfig,
    dir: &Path,
    dry_run: bool,
    stdout: bool,
    interactive: bool,
) -> manifest_yml::Result<bool> {
    // Check the directory before asking for trial values
    let files = discover_manifests(dir)?;
    let settings = resolve_settings(cli, config, interactive)?;

    tracing::info!(
        allowance = %settings.trial.allowance,
        window = %settings.trial.window,
        empty_collections = %settings.options.empty_collections,
        strict = settings.options.strict,
        "Settings resolved"
    );

    let converter = BatchConverter::new(settings.trial, settings.options).with_dry_run(dry_run);
    let quiet = cli.quiet || cli.json;

    let report = converter.run(&files, |input, result| {
        if quiet && result.is_ok() {
            return;
        }
        match result {
            Ok(conversion) => {
                println!(
                    "{} {} -> {}",
                    style::converted_marker(),
                    style::path_style(input),
                    style::path_style(&conversion.output)
                );
                if stdout {
                    print!("{}", conversion.yaml);
                }
            }
            Err(e) => {
                eprintln!(
                    "{} {}: {}",
                    style::failed_marker(),
                    style::path_style(input),
                    e
                );
            }
        }
    });

    print_report(&report, cli.json, cli.quiet)?;
    Ok(report.is_success())
}

fn print_report(report: &BatchReport, json: bool, quiet: bool) -> manifest_yml::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    if report.total() == 0 {
        println!("No XML manifests found.");
    } else {
        println!();
        println!(
            "Converted: {}  Failed: {}",
            style::count_converted(report.converted.len()),
            style::count_failed(report.failed.len())
        );
    }
    Ok(())
}

/// Flag > prompt > config file > built-in default
fn resolve_settings(
    cli: &Cli,
    config: &ConverterConfig,
    interactive: bool,
) -> manifest_yml::Result<Settings> {
    let mut trial = TrialConfig::resolve(
        cli.allowance.clone().or_else(|| config.trial.allowance.clone()),
        cli.window.clone().or_else(|| config.trial.window.clone()),
    );

    if interactive {
        let prompter = Prompter::new();
        if cli.allowance.is_none() {
            trial.allowance = prompter.trial_allowance(&trial.allowance);
        }
        if cli.window.is_none() {
            trial.window = prompter.trial_window(&trial.window);
        }
    }

    let mut options = config.emit_options();
    if let Some(ref policy) = cli.empty_collections {
        options.empty_collections = policy.parse::<EmptyCollections>()?;
    }
    if cli.strict {
        options.strict = true;
    }

    Ok(Settings { trial, options })
}

fn handle_init_command(config_path: Option<&Path>, force: bool) -> manifest_yml::Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(ConverterConfig::default_path);

    if path.exists() && !force {
        return Err(ConvertError::Config(format!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }

    let defaults = TrialConfig::default();
    let mut config = ConverterConfig::default();
    config.trial.allowance = Some(defaults.allowance);
    config.trial.window = Some(defaults.window);
    config.save(&path)?;

    println!("Created config: {}", path.display());
    Ok(())
}
