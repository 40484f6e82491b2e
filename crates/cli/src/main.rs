// ledgerlink CLI — extraction → orchestration → reporting, in sequence.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_UNMATCHED};
use ledgerlink_match::{load_input, run, MatchConfig};

#[derive(Parser)]
#[command(name = "llink")]
#[command(about = "Link bank transactions to the invoice attachments they settle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation batch from a TOML config file
    #[command(after_help = "\
Examples:
  llink run close.toml
  llink run close.toml --json
  llink run close.toml --output report.json")]
    Run {
        /// Path to the config file
        config: PathBuf,

        /// Output the JSON report to stdout instead of just the summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  llink validate close.toml")]
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
}

struct CliError {
    code: u8,
    message: String,
}

fn err(code: u8, message: impl Into<String>) -> CliError {
    CliError { code, message: message.into() }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output } => cmd_run(config, json, output),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            ExitCode::from(e.code)
        }
    }
}

fn cmd_run(config_path: PathBuf, json_output: bool, output_file: Option<PathBuf>) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;
    let config = MatchConfig::from_toml(&config_str)
        .map_err(|e| err(EXIT_INVALID_CONFIG, e.to_string()))?;

    // Input files resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let transactions_csv = read_role_file(base_dir, &config.roles.transactions.file)?;
    let attachments_csv = read_role_file(base_dir, &config.roles.attachments.file)?;

    let input = load_input(&config, &transactions_csv, &attachments_csv)
        .map_err(|e| err(EXIT_RUNTIME, e.to_string()))?;
    let report = run(&config, &input).map_err(|e| err(EXIT_RUNTIME, e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    let json_file = output_file.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    if let Some(ref path) = json_file {
        std::fs::write(path, &json_str)
            .map_err(|e| err(EXIT_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    let s = &report.summary;
    eprintln!(
        "{}: {} transactions — {} by reference, {} by score, {} unmatched",
        report.meta.config_name,
        s.total_transactions,
        s.reference_matched,
        s.scored_matched,
        s.unmatched,
    );

    if s.unmatched > 0 {
        return Err(err(EXIT_UNMATCHED, format!("{} transactions unmatched", s.unmatched)));
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;

    match MatchConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' — threshold {}, tolerance {}, window {} days",
                config.name,
                config.scoring.acceptance_threshold,
                config.scoring.amount_tolerance,
                config.scoring.date_window_days,
            );
            Ok(())
        }
        Err(e) => Err(err(EXIT_INVALID_CONFIG, e.to_string())),
    }
}

fn read_role_file(base_dir: &Path, file: &str) -> Result<String, CliError> {
    let path = base_dir.join(file);
    std::fs::read_to_string(&path)
        .map_err(|e| err(EXIT_RUNTIME, format!("cannot read {}: {e}", path.display())))
}
