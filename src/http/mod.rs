pub mod response;

use reqwest::{header::ACCEPT, Client, RequestBuilder, Url};
use serde::Serialize;
use thiserror::Error;

pub use response::{Response, ResponseHandler};

const USER_AGENT_VALUE: &str = "repo-migrator";

/// Credentials attached to every request sent through an [`HttpClient`].
#[derive(Clone)]
pub enum Auth {
    Bearer(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Bearer(_) => write!(f, "Bearer(***)"),
            Auth::Basic { username, .. } => write!(f, "Basic({}:***)", username),
        }
    }
}

pub struct HttpClient {
    client: Client,
    auth: Auth,
}

impl HttpClient {
    pub fn new(auth: Auth) -> Result<Self, Error> {
        let client = Client::builder().user_agent(USER_AGENT_VALUE).build()?;

        Ok(HttpClient { client, auth })
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.client.get(url).default_headers(&self.auth)
    }

    pub fn post_json<T: Serialize>(&self, url: Url, body: &T) -> RequestBuilder {
        self.client.post(url).default_headers(&self.auth).json(body)
    }
}

pub trait Headers {
    fn default_headers(self, auth: &Auth) -> RequestBuilder;
}

impl Headers for RequestBuilder {
    fn default_headers(self, auth: &Auth) -> RequestBuilder {
        let builder = match auth {
            Auth::Bearer(token) => self.bearer_auth(token),
            Auth::Basic { username, password } => self.basic_auth(username, Some(password)),
        };

        builder.header(ACCEPT, "application/json")
    }
}

/// Appends path segments to `base`, percent-encoding each one.
///
/// A segment containing `/` is sent as a single encoded segment, which is what
/// the destination expects for namespaced project ids and branch names.
pub fn join_segments<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, Error> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl {
            url: base.to_string(),
            reason: "url cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

pub fn parse_url(value: &str) -> Result<Url, Error> {
    let url = Url::parse(value).map_err(|err| Error::InvalidUrl {
        url: value.to_owned(),
        reason: err.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl {
            url: value.to_owned(),
            reason: "url cannot be a base".to_owned(),
        });
    }

    Ok(url)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl Error {
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
