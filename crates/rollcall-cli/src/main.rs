use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rollcall_core::Registry;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollcall", about = "Rollcall attendance inspection CLI")]
struct Cli {
    /// Override the registry blob path.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Override the attendance ledger path.
    #[arg(long)]
    ledger: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known identities and their embedding counts
    Roster {
        #[arg(long)]
        json: bool,
    },
    /// Print attendance ledger rows
    Attendance {
        /// Only rows from today
        #[arg(long)]
        today: bool,
    },
    /// Remove every embedding enrolled for an identity
    Forget { name: String },
}

fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local/share")
        })
        .join("rollcall")
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let registry_path = cli
        .registry
        .unwrap_or_else(|| env_path("ROLLCALL_REGISTRY_PATH", data_dir().join("faces.bin")));
    let ledger_path = cli
        .ledger
        .unwrap_or_else(|| env_path("ROLLCALL_LEDGER_PATH", data_dir().join("attendance.csv")));

    match cli.command {
        Commands::Roster { json } => {
            let registry = Registry::load_file(&registry_path)?;
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for (name, _) in registry.iter() {
                *counts.entry(name.to_string()).or_default() += 1;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else if counts.is_empty() {
                println!("no identities enrolled");
            } else {
                for (name, n) in counts {
                    let plural = if n == 1 { "" } else { "s" };
                    println!("{name}  ({n} embedding{plural})");
                }
            }
        }
        Commands::Attendance { today } => {
            let text = std::fs::read_to_string(&ledger_path)
                .with_context(|| format!("no attendance ledger at {}", ledger_path.display()))?;
            let prefix = chrono::Local::now().format("%Y-%m-%d").to_string();
            for line in text.lines().skip(1) {
                // Timestamp is always the last field; names may be quoted.
                let matches_day = line
                    .rsplit(',')
                    .next()
                    .is_some_and(|ts| ts.starts_with(&prefix));
                if !today || matches_day {
                    println!("{line}");
                }
            }
        }
        Commands::Forget { name } => {
            let mut registry = Registry::load_file(&registry_path)?;
            let removed = registry.remove_name(&name);
            if removed == 0 {
                println!("no embeddings enrolled for {name}");
            } else {
                registry.persist(&registry_path)?;
                let plural = if removed == 1 { "" } else { "s" };
                println!("removed {removed} embedding{plural} for {name}");
            }
        }
    }

    Ok(())
}
