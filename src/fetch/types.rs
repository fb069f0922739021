//! Request/response types shared by all fetch backends.

use std::future::Future;

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be dispatched (DNS, connect, no endpoint).
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("failed to read {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// `Response.ok`: status in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with `FetchError::Status` unless the response is ok.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                url: self.url,
                status: self.status,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|source| FetchError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// Serialized form fields, in document order (`new FormData(form)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub fields: Vec<(String, String)>,
}

impl FormData {
    pub fn append(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Asynchronous fetch backend.
///
/// URLs are absolute (already resolved against the page location) or
/// root-relative paths.
pub trait Fetch {
    /// `GET url`. Non-success statuses are returned as responses, not errors.
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, FetchError>>;

    /// `POST url` with a multipart body and `Accept: application/json`.
    fn post_form(
        &self,
        url: &str,
        form: &FormData,
    ) -> impl Future<Output = Result<Response, FetchError>>;
}

/// GET `url` and decode its JSON body, treating non-success statuses as errors.
pub async fn fetch_json<F: Fetch, T: DeserializeOwned>(fetcher: &F, url: &str) -> Result<T, FetchError> {
    fetcher.get(url).await?.error_for_status()?.json()
}
