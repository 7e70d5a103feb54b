mod change;
mod incident;

pub use change::*;
pub use incident::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "snow")]
#[command(about = "Fetch ServiceNow records for Rundeck jobs", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Change {
        #[command(subcommand)]
        subcommand: change::ChangeCommands,
    },
    Incident {
        #[command(subcommand)]
        subcommand: incident::IncidentCommands,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Change { subcommand } => match subcommand {
            change::ChangeCommands::List(args) => change_list(args).await,
        },
        Commands::Incident { subcommand } => match subcommand {
            incident::IncidentCommands::List(args) => incident_list(args).await,
        },
    }
}
