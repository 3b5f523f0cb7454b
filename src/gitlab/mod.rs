pub mod request;
mod response;

use self::{
    request::{BranchRequest, MergeRequestRequest},
    response::{BranchResponse, MergeRequestResponse},
};
use crate::{
    config::DestinationConfig,
    error::MigrationError,
    http::{self, HttpClient, ResponseHandler},
    migration::{outcome::Outcome, DestinationProbe, DestinationWriter},
};
use reqwest::Url;
use serde_json::Value;

/// Statuses the destination answers with when a branch cannot be created
/// because one with the same name is already there.
const CONFLICT_STATUSES: [u16; 3] = [400, 409, 422];

pub struct GitlabClient {
    http: HttpClient,
    project: Url,
}

impl GitlabClient {
    pub fn new(config: &DestinationConfig) -> Result<Self, MigrationError> {
        let http = HttpClient::new(http::Auth::Bearer(config.token.to_owned()))
            .map_err(MigrationError::Client)?;
        let project =
            http::join_segments(&config.api_url, ["projects", config.project_id.as_str()])
                .map_err(MigrationError::Client)?;

        Ok(GitlabClient { http, project })
    }

    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, http::Error> {
        http::join_segments(&self.project, segments)
    }

    async fn post_branch(&self, request: &BranchRequest) -> Result<BranchResponse, http::Error> {
        let url = self.endpoint(["repository", "branches"])?;

        self.http
            .post_json(url, request)
            .send()
            .await
            .handle()
            .await?
            .error_for_status()?
            .json()
    }

    async fn post_merge_request(
        &self,
        request: &MergeRequestRequest,
    ) -> Result<http::Response, http::Error> {
        let url = self.endpoint(["merge_requests"])?;

        self.http
            .post_json(url, request)
            .send()
            .await
            .handle()
            .await?
            .error_for_status()
    }

    /// Decides what a conflict-class rejection of `branch` means.
    async fn confirm_conflict(&self, branch: &str, err: http::Error) -> Outcome {
        match self.branch_exists(branch).await {
            Ok(true) => Outcome::SkippedAlreadyExists,
            Ok(false) => Outcome::Failed(err.to_string()),
            Err(lookup) => {
                log::warn!(
                    "cannot confirm that branch {} exists ({}), treating {} as a duplicate",
                    branch,
                    lookup,
                    err
                );
                Outcome::SkippedAlreadyExists
            }
        }
    }
}

impl DestinationProbe for GitlabClient {
    async fn branch_exists(&self, name: &str) -> Result<bool, http::Error> {
        let url = self.endpoint(["repository", "branches", name])?;
        let response = self.http.get(url).send().await.handle().await?;

        if response.status == 404 {
            return Ok(false);
        }

        response.error_for_status().map(|_| true)
    }

    async fn merge_request_exists(&self, source: &str, target: &str) -> Result<bool, http::Error> {
        let mut url = self.endpoint(["merge_requests"])?;
        url.query_pairs_mut()
            .append_pair("source_branch", source)
            .append_pair("target_branch", target)
            .append_pair("state", "all");

        let matches: Vec<Value> = self
            .http
            .get(url)
            .send()
            .await
            .handle()
            .await?
            .error_for_status()?
            .json()?;

        Ok(!matches.is_empty())
    }
}

impl DestinationWriter for GitlabClient {
    async fn create_branch(&self, request: &BranchRequest) -> Outcome {
        match self.post_branch(request).await {
            Ok(branch) => {
                log::debug!("destination created branch {}", branch.name);
                Outcome::Created {
                    url: branch.web_url,
                }
            }
            // the branch was created but its representation was unexpected
            Err(http::Error::Parse(err)) => {
                log::debug!("cannot parse created branch {}: {}", request.branch, err);
                Outcome::Created { url: None }
            }
            Err(err) if err.status().is_some_and(|s| CONFLICT_STATUSES.contains(&s)) => {
                self.confirm_conflict(&request.branch, err).await
            }
            Err(err) => Outcome::Failed(err.to_string()),
        }
    }

    async fn create_merge_request(&self, request: &MergeRequestRequest) -> Outcome {
        let response = match self.post_merge_request(request).await {
            Ok(response) => response,
            Err(err) => return Outcome::Failed(err.to_string()),
        };

        match response.json::<MergeRequestResponse>() {
            Ok(created) => {
                log::debug!("destination created merge request !{}", created.iid);
                Outcome::Created {
                    url: created.web_url,
                }
            }
            Err(err) => {
                log::debug!("cannot parse created merge request: {}", err);
                Outcome::Created { url: None }
            }
        }
    }
}
