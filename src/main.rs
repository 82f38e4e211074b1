//! audit-gate: dependency vulnerability gate for CI
//!
//! Classifies a dependency-audit report against a team-maintained allowlist
//! and exits non-zero when the build should be blocked.

use anyhow::{Context, Result};
use audit_gate::{
    cli,
    config::{
        file::{search_dirs, CONFIG_FILE_NAMES},
        AppConfig, CheckConfig, ReportSource, Validatable,
    },
    error::AuditGateError,
    policy::parse_expiry,
    reports::ReportFormat,
};
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported audit report formats:",
        "\n  legacy  (advisories map)",
        "\n  modern  (vulnerabilities map with via entries)",
        "\n\nOutput Formats:",
        "\n  summary, json"
    )
}

#[derive(Parser)]
#[command(name = "audit-gate")]
#[command(version, long_version = build_long_version())]
#[command(about = "Gate CI builds on dependency audit findings", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No new or expired high/critical findings
    1  Gate failed, or an error occurred

EXAMPLES:
    # Check a saved audit report against .audit-allowlist.json
    audit-gate check audit.json

    # Pipe the auditor's output straight in
    npm audit --json | audit-gate check -

    # Structured output for later processing
    audit-gate check audit.json -o json -O audit-gate.json

    # Review allowlist expirations
    audit-gate allowlist check")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "AUDIT_GATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `check` subcommand
#[derive(Parser)]
struct CheckArgs {
    /// Audit report path (`-` or omitted for stdin)
    report: Option<PathBuf>,

    /// Allowlist file (default: .audit-allowlist.json)
    #[arg(short, long)]
    allowlist: Option<PathBuf>,

    /// Evaluation time (ISO 8601 date or date-time, default: now)
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Report allowlist entries expiring within this many days (default: 30)
    #[arg(long)]
    expiring_days: Option<i64>,

    /// Output format
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an audit report against the allowlist
    Check(CheckArgs),

    /// Inspect the allowlist
    Allowlist {
        #[command(subcommand)]
        action: AllowlistAction,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `allowlist` command
#[derive(Subcommand)]
enum AllowlistAction {
    /// Validate the allowlist and show each entry's expiration status
    Check {
        /// Allowlist file (default: from config, then .audit-allowlist.json)
        path: Option<PathBuf>,

        /// Evaluation time (ISO 8601 date or date-time, default: now)
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<Utc>>,

        /// Expiring-soon window in days (default: 30)
        #[arg(long)]
        expiring_days: Option<i64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON Schema of the allowlist document
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .audit-gate.yaml in the current directory
    Init,
    /// Print the JSON Schema of the config file format
    Schema,
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    parse_expiry(value)
        .ok_or_else(|| format!("invalid date '{value}', expected an ISO 8601 date or date-time"))
}

/// Load the config file and layer CLI overrides on top.
fn resolve_config(cli: &Cli, overrides: &AppConfig) -> Result<AppConfig> {
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), overrides)
            .map_err(AuditGateError::from)?;
    if let Some(path) = &loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    config.ensure_valid()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so report output on stdout stays machine-readable
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let exit_code = match &cli.command {
        Commands::Check(args) => {
            let overrides = AppConfig::builder()
                .allowlist_path(args.allowlist.clone())
                .expiring_days(args.expiring_days)
                .output_format(args.output)
                .output_file(args.output_file.clone())
                .no_color(cli.no_color)
                .build();
            let app_config = resolve_config(&cli, &overrides)?;

            let config = CheckConfig::from_app_config(
                &app_config,
                ReportSource::from_arg(args.report.clone()),
                args.now.unwrap_or_else(Utc::now),
                cli.quiet,
            );
            cli::run_check(config)?
        }

        Commands::Allowlist { action } => match action {
            AllowlistAction::Check {
                path,
                now,
                expiring_days,
                json,
            } => {
                let overrides = AppConfig::builder()
                    .allowlist_path(path.clone())
                    .expiring_days(*expiring_days)
                    .build();
                let app_config = resolve_config(&cli, &overrides)?;
                cli::run_allowlist_check(
                    &app_config.allowlist.path(),
                    now.unwrap_or_else(Utc::now),
                    app_config.policy.expiring_days(),
                    *json,
                    cli.quiet,
                )?
            }
            AllowlistAction::Schema { output } => cli::run_allowlist_schema(output.as_deref())?,
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    audit_gate::config::load_or_default(cli.config.as_deref())
                        .map_err(AuditGateError::from)?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                0
            }
            ConfigAction::Path => {
                eprintln!("Config file search paths (in order):");
                for dir in search_dirs() {
                    eprintln!("  {}", dir.display());
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match audit_gate::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                0
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".audit-gate.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = audit_gate::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                0
            }
            ConfigAction::Schema => {
                let schema = audit_gate::config::generate_json_schema()
                    .context("failed to serialize config schema")?;
                println!("{schema}");
                0
            }
        },

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "audit-gate", &mut io::stdout());
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
