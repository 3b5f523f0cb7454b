use super::{
    mapper,
    outcome::{Outcome, Phase, PhaseReport},
    summary::RunSummary,
    DestinationProbe, DestinationWriter, SourceLister,
};
use crate::error::MigrationError;

/// Drives the branch and pull request phases.
///
/// Items are processed one at a time in source order so every existence check
/// observes the creations made before it.
pub struct Migration<'a, S, D> {
    source: &'a S,
    destination: &'a D,
}

impl<'a, S, D> Migration<'a, S, D>
where
    S: SourceLister,
    D: DestinationProbe + DestinationWriter,
{
    pub fn new(source: &'a S, destination: &'a D) -> Self {
        Migration {
            source,
            destination,
        }
    }

    /// Runs the given phases in order. A phase whose listing fails is recorded
    /// as aborted and the next phase still runs.
    pub async fn run(&self, phases: &[Phase]) -> RunSummary {
        let mut summary = RunSummary::default();

        for phase in phases {
            let report = match phase {
                Phase::Branches => self.migrate_branches().await,
                Phase::PullRequests => self.migrate_pull_requests().await,
            };

            match report {
                Ok(report) => summary.record_report(&report),
                Err(err) => {
                    log::error!("{} phase aborted: {}", phase, err);
                    summary.record_abort(*phase, err.to_string());
                }
            }
        }

        summary
    }

    pub async fn migrate_branches(&self) -> Result<PhaseReport, MigrationError> {
        log::info!("Fetching source branches");
        let branches = self.source.list_branches().await?;
        let total = branches.len();
        log::info!("Found {} branches", total);

        let mut report = PhaseReport::new(Phase::Branches);

        for (index, branch) in branches.iter().enumerate() {
            log::info!("[{}/{}] Copying branch {}", index + 1, total, branch.name);

            let request = mapper::to_branch_request(branch);
            let outcome = self.destination.create_branch(&request).await;

            log_outcome("Branch", &branch.name, &outcome);
            report.record(&branch.name, outcome);
        }

        Ok(report)
    }

    pub async fn migrate_pull_requests(&self) -> Result<PhaseReport, MigrationError> {
        log::info!("Fetching source pull requests");
        let pull_requests = self.source.list_pull_requests().await?;
        let total = pull_requests.len();
        log::info!("Found {} pull requests", total);

        let mut report = PhaseReport::new(Phase::PullRequests);

        for (index, pull_request) in pull_requests.iter().enumerate() {
            let label = format!("#{} {}", pull_request.id, pull_request.title);
            log::info!("[{}/{}] Copying pull request {}", index + 1, total, label);

            let exists = self
                .destination
                .merge_request_exists(&pull_request.source_branch, &pull_request.target_branch)
                .await;

            let outcome = match exists {
                Ok(true) => {
                    log::info!(
                        "Merge request for {} -> {} already exists, skipping",
                        pull_request.source_branch,
                        pull_request.target_branch
                    );
                    Outcome::SkippedAlreadyExists
                }
                Ok(false) => {
                    let request = mapper::to_merge_request_request(pull_request);
                    self.destination.create_merge_request(&request).await
                }
                Err(err) => {
                    Outcome::Failed(format!("cannot look up existing merge requests: {}", err))
                }
            };

            log_outcome("Pull request", &label, &outcome);
            report.record(label, outcome);
        }

        Ok(report)
    }
}

fn log_outcome(kind: &str, item: &str, outcome: &Outcome) {
    if outcome.is_failed() {
        log::warn!("{} {} {}", kind, item, outcome);
    } else {
        log::info!("{} {} {}", kind, item, outcome);
    }
}
