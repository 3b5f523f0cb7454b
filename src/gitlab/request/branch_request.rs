use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRequest {
    pub branch: String,
    pub r#ref: String,
}

impl BranchRequest {
    pub fn new(branch: impl Into<String>, r#ref: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            r#ref: r#ref.into(),
        }
    }
}
