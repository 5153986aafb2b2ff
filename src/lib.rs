pub mod builds;
pub mod cli;
mod config;
pub mod request;
pub mod teamcity;

pub use crate::config::Settings;

use anyhow::Result;
use log::info;
use teamcity::QueueOutcome;

/// Queue the build described by `cli` and return what TeamCity made of it
pub async fn run(cli: &cli::Cli) -> Result<QueueOutcome> {
    let (settings, request) = builds::dispatch(&cli.command)?;
    info!(
        "Starting {} build of {} from {}",
        request.build_type().command_name(),
        request.branch(),
        request.remote()
    );
    let client = teamcity::Client::new(&settings.teamcity, settings.credentials)?;
    client.queue_build(&request).await
}
