//! The command line interface for fuelcost.
use crate::case::{CaseID, ScenarioSettingsMap};
use crate::input::load_case;
use crate::log;
use crate::output::{create_output_directory, get_output_dir};
use crate::settings::Settings;
use crate::year::parse_year_str;
use ::log::{info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for fuelcost.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the `run` command
#[derive(Args)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// The scenario to run (defaults to the first in the scenario definitions table)
    #[arg(long)]
    pub case_id: Option<String>,
    /// The periods to run: "all", a single year, years separated by ';' or a range (start..end)
    #[arg(long, default_value = "all")]
    pub years: String,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            output_dir: None,
            overwrite: false,
            case_id: None,
            years: "all".into(),
        }
    }
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build fuel cost tables for a case.
    Run {
        /// Path to the case directory.
        case_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example cases.
    Example {
        /// The available subcommands for managing example cases.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a case.
    Validate {
        /// The path to the case directory.
        case_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { case_dir, opts } => handle_run_command(&case_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { case_dir } => handle_validate_command(&case_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start fuelcost
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ fuelcost --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    if let Some(command) = cli.command {
        command.execute()?;
    } else {
        // No command provided. Show help.
        Cli::command().print_long_help()?;
    }

    Ok(())
}

/// Choose the scenario and periods to run from the command-line options
fn select_scenario(scenarios: &ScenarioSettingsMap, opts: &RunOpts) -> Result<(CaseID, Vec<u32>)> {
    let case_id = if let Some(case_id) = opts.case_id.as_deref() {
        CaseID::from(case_id)
    } else {
        scenarios
            .iter_case_ids()
            .next()
            .context("No scenarios defined")?
            .clone()
    };

    let valid_years = scenarios.years_for_case(&case_id);
    ensure!(
        !valid_years.is_empty(),
        "Case {case_id} is not defined in the scenario definitions table"
    );
    let years = parse_year_str(&opts.years, &valid_years)
        .with_context(|| format!("Invalid years for case {case_id}"))?;

    Ok((case_id, years))
}

/// Handle the `run` command.
pub fn handle_run_command(
    case_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let mut settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // These settings can be overridden by command-line arguments
    if opts.overwrite {
        settings.overwrite = true;
    }

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(case_path, settings.results_root)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path)).context("Failed to initialise logging.")?;

    info!("Starting fuelcost v{}", env!("CARGO_PKG_VERSION"));

    // Load the settings for each scenario and period
    let scenarios = load_case(case_path).context("Failed to load case.")?;
    info!("Loaded case from {}", case_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let (case_id, years) = select_scenario(&scenarios, opts)?;
    crate::pipeline::run(case_path, &scenarios, &case_id, &years, output_path)?;
    info!("Fuel cost tables complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(case_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the case
    let scenarios = load_case(case_path).context("Failed to validate case.")?;
    crate::pipeline::validate(case_path, &scenarios).context("Failed to validate case.")?;
    info!("Case validation successful!");

    Ok(())
}
