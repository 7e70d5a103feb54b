use crate::api::{QueryOptions, SnowClient};
use crate::config::Credentials;
use crate::output::{print_incidents, write_count, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum IncidentCommands {
    #[command(alias = "ls")]
    List(IncidentListArgs),
}

#[derive(Args)]
pub struct IncidentListArgs {
    /// Assignment group sys_id to filter on.
    #[arg(
        long,
        env = "RD_OPTION_SNOW_ASSIGNMENT_GROUP",
        default_value = "abcdegeghfkkd"
    )]
    assignment_group: String,
    /// State value to filter on.
    #[arg(long, env = "RD_OPTION_SNOW_STATE", default_value = "15")]
    state: String,
    #[arg(long, default_value_t = 1000)]
    limit: u32,
    #[arg(long, default_value = "incident_count.txt")]
    count_file: PathBuf,
    #[arg(long, default_value = "human")]
    output: OutputFormat,
}

pub async fn incident_list(args: IncidentListArgs) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let client = SnowClient::authenticate(&credentials).await?;

    let options = QueryOptions {
        assignment_group: args.assignment_group,
        state: args.state,
        limit: args.limit,
    };
    let incidents = client.list_incidents(&options).await?;

    print_incidents(&incidents, args.output);
    write_count(&args.count_file, incidents.len())?;

    Ok(())
}
