mod response;

use self::response::{BranchResponse, Page, PullRequestResponse};
use crate::{
    config::SourceConfig,
    error::MigrationError,
    http::{self, HttpClient, ResponseHandler},
    migration::{
        record::{BranchRecord, PullRequestRecord},
        SourceLister,
    },
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::{collections::HashSet, iter};

pub struct BitbucketClient {
    http: HttpClient,
    repository: Url,
    page_len: u32,
}

impl BitbucketClient {
    pub fn new(config: &SourceConfig) -> Result<Self, MigrationError> {
        let http = HttpClient::new(config.auth.clone()).map_err(MigrationError::Client)?;
        let repository = http::join_segments(
            &config.api_url,
            iter::once("repositories").chain(config.repo.split('/')),
        )
        .map_err(MigrationError::Client)?;

        Ok(BitbucketClient {
            http,
            repository,
            page_len: config.page_len,
        })
    }

    fn listing_url(&self, resource: &[&str]) -> Result<Url, http::Error> {
        let mut url = http::join_segments(&self.repository, resource.iter().copied())?;
        url.query_pairs_mut()
            .append_pair("pagelen", &self.page_len.to_string());

        Ok(url)
    }

    /// Follows `next` links from `first` until the last page, keeping the
    /// order in which values were served.
    async fn collect_pages<T, R>(&self, first: Url) -> Result<Vec<R>, http::Error>
    where
        T: DeserializeOwned,
        R: From<T>,
    {
        let mut records = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(first.to_string());

        while let Some(link) = next.take() {
            if !visited.insert(link.clone()) {
                return Err(http::Error::InvalidUrl {
                    url: link,
                    reason: "next page link was already visited".to_owned(),
                });
            }

            let url = http::parse_url(&link)?;
            log::debug!("fetching page {}", url);

            let page: Page<T> = self
                .http
                .get(url)
                .send()
                .await
                .handle()
                .await?
                .error_for_status()?
                .json()?;

            log::debug!("page returned {} values", page.values.len());
            records.extend(page.values.into_iter().map(R::from));
            next = page.next.filter(|link| !link.is_empty());
        }

        Ok(records)
    }
}

impl SourceLister for BitbucketClient {
    async fn list_branches(&self) -> Result<Vec<BranchRecord>, MigrationError> {
        let first = self
            .listing_url(&["refs", "branches"])
            .map_err(|cause| MigrationError::SourceUnavailable {
                entity: "branches",
                cause,
            })?;

        self.collect_pages::<BranchResponse, BranchRecord>(first)
            .await
            .map_err(|cause| MigrationError::SourceUnavailable {
                entity: "branches",
                cause,
            })
    }

    async fn list_pull_requests(&self) -> Result<Vec<PullRequestRecord>, MigrationError> {
        let first = self
            .listing_url(&["pullrequests"])
            .map_err(|cause| MigrationError::SourceUnavailable {
                entity: "pull requests",
                cause,
            })?;

        self.collect_pages::<PullRequestResponse, PullRequestRecord>(first)
            .await
            .map_err(|cause| MigrationError::SourceUnavailable {
                entity: "pull requests",
                cause,
            })
    }
}
