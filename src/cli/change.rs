use crate::api::{QueryOptions, SnowClient};
use crate::config::Credentials;
use crate::output::{print_change_requests, write_change_summary, write_count, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ChangeCommands {
    #[command(alias = "ls")]
    List(ChangeListArgs),
}

#[derive(Args)]
pub struct ChangeListArgs {
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
    #[arg(long, default_value = "change_request_summary.txt")]
    summary_file: PathBuf,
    #[arg(long, default_value = "change_count.txt")]
    count_file: PathBuf,
    #[arg(long, default_value = "human")]
    output: OutputFormat,
}

pub async fn change_list(args: ChangeListArgs) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let client = SnowClient::authenticate(&credentials).await?;

    let options = QueryOptions {
        assignment_group: args.assignment_group,
        state: args.state,
        limit: args.limit,
    };
    let changes = client.list_change_requests(&options).await?;

    print_change_requests(&changes, args.output);
    write_change_summary(&args.summary_file, &changes)?;
    write_count(&args.count_file, changes.len())?;

    Ok(())
}
