use super::Error;
use serde::de::DeserializeOwned;

/// A fully read HTTP response.
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub text: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`Error::Status`] carrying the body text.
    pub fn error_for_status(self) -> Result<Response, Error> {
        if self.is_success() {
            return Ok(self);
        }

        let message = if self.text.trim().is_empty() {
            reqwest::StatusCode::from_u16(self.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("unknown status")
                .to_owned()
        } else {
            self.text.trim().to_owned()
        };

        Err(Error::Status {
            status: self.status,
            message,
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_str::<T>(&self.text)?)
    }
}

pub trait ResponseHandler {
    async fn handle(self) -> Result<Response, Error>;
}

impl ResponseHandler for Result<reqwest::Response, reqwest::Error> {
    async fn handle(self) -> Result<Response, Error> {
        let response = self?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(Response { status, text })
    }
}
