use crate::migration::record::BranchRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BranchResponse {
    pub name: String,
    pub target: Target,
}

#[derive(Debug, Deserialize)]
pub struct Target {
    pub hash: String,
}

impl From<BranchResponse> for BranchRecord {
    fn from(branch: BranchResponse) -> Self {
        BranchRecord {
            name: branch.name,
            target_hash: branch.target.hash,
        }
    }
}
