use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use md_estimator::estimate::{CoefficientField, Estimator, InputField};
use md_estimator::{config, export, tui};

const EXIT_SUCCESS: i32 = 0;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Value overrides shared by the one-shot subcommands. Anything not given
/// keeps its configured (or first-load) default.
#[derive(Args, Debug)]
struct EstimateArgs {
    /// Development effort in man-days
    #[arg(long)]
    dev: Option<f64>,

    /// QA effort in man-days (disables auto-QA for this run)
    #[arg(long)]
    qa: Option<f64>,

    /// Architecture/research effort in man-days
    #[arg(long)]
    arch: Option<f64>,

    /// PM/BA/management effort in man-days
    #[arg(long)]
    pm: Option<f64>,

    /// Productivity multiplier applied to all role efforts
    #[arg(long)]
    focus_factor: Option<f64>,

    /// Risk buffer as a fraction of core effort
    #[arg(long)]
    risk_factor: Option<f64>,

    /// Communication buffer as a fraction of base effort
    #[arg(long)]
    comm_buffer: Option<f64>,

    /// Auto-QA percentage of dev (0-100)
    #[arg(long)]
    qa_percentage: Option<f64>,
}

impl EstimateArgs {
    // Everything goes through the engine setters: out-of-range flags are
    // clamped, never rejected, same as typing them into the form.
    fn apply(&self, estimator: &mut Estimator) {
        if let Some(dev) = self.dev {
            estimator.set_input_value(InputField::Dev, dev);
        }
        if let Some(arch) = self.arch {
            estimator.set_input_value(InputField::Arch, arch);
        }
        if let Some(pm) = self.pm {
            estimator.set_input_value(InputField::Pm, pm);
        }
        if let Some(percentage) = self.qa_percentage {
            estimator.set_auto_qa(true);
            estimator.set_auto_qa_percentage(percentage);
        }
        if let Some(qa) = self.qa {
            // An explicit QA value wins over auto derivation
            estimator.set_auto_qa(false);
            estimator.set_input_value(InputField::Qa, qa);
        }
        if let Some(focus_factor) = self.focus_factor {
            estimator.set_coefficient_value(CoefficientField::FocusFactor, focus_factor);
        }
        if let Some(risk_factor) = self.risk_factor {
            estimator.set_coefficient_value(CoefficientField::RiskFactor, risk_factor);
        }
        if let Some(comm_buffer) = self.comm_buffer {
            estimator.set_coefficient_value(CoefficientField::CommBuffer, comm_buffer);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive estimation form (default if no subcommand)
    Tui,
    /// Compute an estimate from flags and print the breakdown
    Estimate {
        #[command(flatten)]
        values: EstimateArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Compute an estimate and write it as a CSV file
    Export {
        #[command(flatten)]
        values: EstimateArgs,

        /// Output file (defaults to the configured export path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "md-estimator")]
#[command(about = "Man-day estimation calculator for IT initiatives", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/md-estimator/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = config::run_init_wizard(config_path) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_IO);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        let estimator = config.build_estimator();
        eprintln!(
            "Starting state: inputs {:?}, coefficients {:?}, auto-QA {:?}",
            estimator.inputs(),
            estimator.coefficients(),
            estimator.auto_qa()
        );
    }

    match command {
        Commands::Tui => {
            let theme = tui::resolve_theme(tui::Theme::from_config(config.theme.as_deref()));
            let app = tui::App::new(config, theme);
            if let Err(e) = tui::run_tui(app).await {
                eprintln!("TUI error: {}", e);
                std::process::exit(EXIT_IO);
            }
        }
        Commands::Estimate { values, format } => {
            let mut estimator = config.build_estimator();
            values.apply(&mut estimator);
            let breakdown = estimator.breakdown();

            match format {
                OutputFormat::Table => {
                    let use_colors = export::should_use_colors();
                    println!("{}", export::format_breakdown_table(&breakdown, use_colors));
                    println!();
                    println!("{}", export::format_summary(&breakdown, use_colors));
                }
                OutputFormat::Tsv => {
                    println!("{}", export::format_tsv(&breakdown));
                }
                OutputFormat::Json => {
                    match export::format_json(
                        estimator.inputs(),
                        estimator.coefficients(),
                        estimator.auto_qa(),
                        &breakdown,
                    ) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Failed to serialize estimate: {}", e);
                            std::process::exit(EXIT_IO);
                        }
                    }
                }
            }
        }
        Commands::Export { values, output } => {
            let mut estimator = config.build_estimator();
            values.apply(&mut estimator);
            let breakdown = estimator.breakdown();

            let path =
                output.unwrap_or_else(|| export::resolve_export_path(config.export.as_ref()));
            if let Err(e) = export::write_csv(
                &path,
                estimator.inputs(),
                estimator.coefficients(),
                &breakdown,
            ) {
                eprintln!("Export failed: {}", e);
                std::process::exit(EXIT_IO);
            }
            println!("Exported estimate to {}", path.display());
        }
        Commands::Init => unreachable!("handled above"),
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}
