//! Metadesk CLI
//!
//! Replays dashboard actions against a fresh in-memory store and prints the
//! resulting state.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use metadesk::{AppStore, DashboardConfig, DashboardStats, SchemaRegistry, SchemaSummary};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metadesk")]
#[command(about = "In-memory schema registry and project data store")]
#[command(version)]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply newline-delimited JSON actions and print the final state
    Replay {
        /// Action file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Print dashboard statistics instead of the snapshot
        #[arg(long)]
        stats: bool,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the built-in demo schemas
    Seed,

    /// View or create configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "metadesk.toml")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(config: &DashboardConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DashboardConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_tracing(&config);

    match cli.command {
        Commands::Replay {
            input,
            stats,
            pretty,
        } => {
            let mut store = AppStore::from_config(&config)?;

            if input.as_os_str() == "-" {
                store.replay(io::stdin().lock())?;
            } else {
                let file = File::open(&input)
                    .with_context(|| format!("cannot open {}", input.display()))?;
                store.replay(BufReader::new(file))?;
            }

            if stats {
                #[derive(serde::Serialize)]
                #[serde(rename_all = "camelCase")]
                struct Report<'a> {
                    dashboard: DashboardStats,
                    schemas: Vec<(&'a str, SchemaSummary)>,
                }
                let report = Report {
                    dashboard: DashboardStats::collect(&store),
                    schemas: store
                        .registry()
                        .schemas()
                        .iter()
                        .map(|s| (s.id.as_str(), SchemaSummary::of(s)))
                        .collect(),
                };
                print_json(&report, pretty)?;
            } else {
                print_json(&store.snapshot(), pretty)?;
            }
            Ok(())
        }

        Commands::Seed => {
            let registry = SchemaRegistry::seeded(chrono::Utc::now())?;
            print_json(&registry.schemas(), true)
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show { toml, json } => {
                if json {
                    print_json(&config, true)?;
                } else if toml {
                    println!("{}", toml::to_string_pretty(&config)?);
                } else {
                    println!("Store:");
                    println!("  seed_demo_schemas: {}", config.store.seed_demo_schemas);
                    println!("  id_scheme: {:?}", config.store.id_scheme);
                    println!("UI:");
                    println!("  theme: {}", config.ui.theme);
                    println!("  toast_ttl_ms: {}", config.ui.toast_ttl_ms);
                    println!("Logging:");
                    println!("  filter: {}", config.logging.filter);
                }
                Ok(())
            }

            ConfigCommands::Init { output } => {
                if std::path::Path::new(&output).exists() {
                    anyhow::bail!("{} already exists", output);
                }
                DashboardConfig::default().save(&output)?;
                println!("Wrote {}", output);
                Ok(())
            }
        },
    }
}
