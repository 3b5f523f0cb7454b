mod bitbucket;
mod config;
mod error;
mod gitlab;
mod http;
mod logger;
mod migration;

use anyhow::{bail, Context, Result};
use bitbucket::BitbucketClient;
use config::Config;
use gitlab::GitlabClient;
use migration::{outcome::Phase, Migration};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logger::init()?;

    log::info!("Starting");
    let config = Config::load()
        .await
        .context("Cannot load migration settings")?;
    config.log_settings();

    let source = BitbucketClient::new(&config.source).context("Cannot set up the source client")?;
    let destination =
        GitlabClient::new(&config.destination).context("Cannot set up the destination client")?;

    let summary = Migration::new(&source, &destination)
        .run(&config.phases)
        .await;

    log::info!(
        "Processed {} branches and {} pull requests",
        summary.counts(Phase::Branches).total(),
        summary.counts(Phase::PullRequests).total()
    );
    println!("{}", summary);

    if summary.has_aborted_phases() {
        bail!("{} phase(s) could not be migrated", summary.aborted.len());
    }

    if summary.has_failures() {
        bail!("{} item(s) failed to migrate", summary.failed());
    }

    log::info!("All selected branches and pull requests are on the destination");

    Ok(())
}
