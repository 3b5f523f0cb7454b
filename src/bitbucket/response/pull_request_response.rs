use crate::migration::record::PullRequestRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PullRequestResponse {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source: Endpoint,
    pub destination: Endpoint,
}

#[derive(Debug, Deserialize)]
pub struct Endpoint {
    pub branch: BranchName,
}

#[derive(Debug, Deserialize)]
pub struct BranchName {
    pub name: String,
}

impl From<PullRequestResponse> for PullRequestRecord {
    fn from(pull_request: PullRequestResponse) -> Self {
        PullRequestRecord {
            id: pull_request.id.to_string(),
            title: pull_request.title,
            description: pull_request.description.unwrap_or_default(),
            source_branch: pull_request.source.branch.name,
            target_branch: pull_request.destination.branch.name,
        }
    }
}
