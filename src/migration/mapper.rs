use super::record::{BranchRecord, PullRequestRecord};
use crate::gitlab::request::{BranchRequest, MergeRequestRequest};

pub fn to_branch_request(record: &BranchRecord) -> BranchRequest {
    BranchRequest::new(&record.name, &record.target_hash)
}

/// Migrated merge requests never delete their source branch and never squash,
/// whatever the source pull request was configured to do.
pub fn to_merge_request_request(record: &PullRequestRecord) -> MergeRequestRequest {
    MergeRequestRequest {
        title: record.title.to_owned(),
        description: record.description.to_owned(),
        source_branch: record.source_branch.to_owned(),
        target_branch: record.target_branch.to_owned(),
        remove_source_branch: false,
        squash: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_request(title: &str, source: &str, target: &str) -> PullRequestRecord {
        PullRequestRecord {
            id: "7".to_owned(),
            title: title.to_owned(),
            description: format!("{} description", title),
            source_branch: source.to_owned(),
            target_branch: target.to_owned(),
        }
    }

    #[test]
    fn branch_points_at_source_commit() {
        let record = BranchRecord {
            name: "feature/a".to_owned(),
            target_hash: "9fceb02d0ae598e95dc970b74767f19372d61af8".to_owned(),
        };

        let request = to_branch_request(&record);

        assert_eq!(request.branch, "feature/a");
        assert_eq!(request.r#ref, "9fceb02d0ae598e95dc970b74767f19372d61af8");
    }

    #[test]
    fn merge_request_copies_metadata() {
        let request = to_merge_request_request(&pull_request("Add a", "feature/a", "main"));

        assert_eq!(request.title, "Add a");
        assert_eq!(request.description, "Add a description");
        assert_eq!(request.source_branch, "feature/a");
        assert_eq!(request.target_branch, "main");
    }

    #[test]
    fn merge_request_never_removes_source_or_squashes() {
        let records = [
            pull_request("", "", ""),
            pull_request("Release", "release/1.0", "main"),
            pull_request("Hotfix", "main", "release/1.0"),
        ];

        for record in &records {
            let request = to_merge_request_request(record);
            assert!(!request.remove_source_branch);
            assert!(!request.squash);
        }
    }
}
