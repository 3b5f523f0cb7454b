use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BranchResponse {
    pub name: String,
    #[serde(default)]
    pub web_url: Option<String>,
}
