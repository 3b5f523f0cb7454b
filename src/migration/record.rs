/// Snapshot of a source branch taken at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    pub name: String,
    pub target_hash: String,
}

/// Snapshot of a source pull request taken at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    /// Source-side identifier, only used in log lines.
    pub id: String,
    pub title: String,
    pub description: String,
    pub source_branch: String,
    pub target_branch: String,
}
