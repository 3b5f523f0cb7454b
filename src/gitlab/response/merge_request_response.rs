use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MergeRequestResponse {
    pub iid: u64,
    #[serde(default)]
    pub web_url: Option<String>,
}
