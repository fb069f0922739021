//! In-memory `Fetch` double that records every request.

use std::cell::RefCell;
use std::collections::HashMap;

use super::types::{Fetch, FetchError, FormData, Response};

#[derive(Debug, Clone)]
enum Canned {
    Respond(u16, Vec<u8>),
    Unreachable,
}

#[derive(Debug, Default)]
pub struct MemoryFetcher {
    routes: HashMap<String, Canned>,
    post_status: Option<u16>,
    requests: RefCell<Vec<String>>,
    posts: RefCell<Vec<(String, FormData)>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`.
    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), Canned::Respond(200, body.as_bytes().to_vec()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.routes
            .insert(url.to_string(), Canned::Respond(status, Vec::new()));
        self
    }

    /// Make `url` fail as if the network were down.
    pub fn with_network_error(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Canned::Unreachable);
        self
    }

    /// Status returned by form posts; `None` (the default) fails them as unreachable.
    pub fn with_post_status(mut self, status: u16) -> Self {
        self.post_status = Some(status);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }

    pub fn posts(&self) -> Vec<(String, FormData)> {
        self.posts.borrow().clone()
    }
}

impl Fetch for MemoryFetcher {
    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.routes.get(url) {
            Some(Canned::Respond(status, body)) => Ok(Response::new(url, *status, body.clone())),
            Some(Canned::Unreachable) => Err(FetchError::Network {
                url: url.to_string(),
                message: "unreachable".to_string(),
            }),
            None => Ok(Response::new(url, 404, Vec::new())),
        }
    }

    async fn post_form(&self, url: &str, form: &FormData) -> Result<Response, FetchError> {
        self.posts.borrow_mut().push((url.to_string(), form.clone()));
        match self.post_status {
            Some(status) => Ok(Response::new(url, status, b"{}".to_vec())),
            None => Err(FetchError::Network {
                url: url.to_string(),
                message: "unreachable".to_string(),
            }),
        }
    }
}
