pub mod mapper;
pub mod orchestrator;
pub mod outcome;
pub mod record;
pub mod summary;

use crate::{
    error::MigrationError,
    gitlab::request::{BranchRequest, MergeRequestRequest},
    http,
};
use outcome::Outcome;
use record::{BranchRecord, PullRequestRecord};

pub use orchestrator::Migration;

/// Read side of the migration: every branch and pull request of the source
/// repository, with pagination fully drained.
pub trait SourceLister {
    async fn list_branches(&self) -> Result<Vec<BranchRecord>, MigrationError>;
    async fn list_pull_requests(&self) -> Result<Vec<PullRequestRecord>, MigrationError>;
}

/// Existence checks against the destination.
///
/// Merge requests are matched on the (source, target) branch pair only, in
/// any state. Two distinct historical pull requests between the same pair are
/// indistinguishable, so only the first one is ever migrated.
pub trait DestinationProbe {
    async fn branch_exists(&self, name: &str) -> Result<bool, http::Error>;
    async fn merge_request_exists(&self, source: &str, target: &str) -> Result<bool, http::Error>;
}

/// Creation calls against the destination. Failures are reported as
/// [`Outcome::Failed`] rather than errors.
pub trait DestinationWriter {
    async fn create_branch(&self, request: &BranchRequest) -> Outcome;
    async fn create_merge_request(&self, request: &MergeRequestRequest) -> Outcome;
}
