//! `SiteFetcher`: serves same-origin requests from the site root, forwards the rest.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{Client, multipart};
use tracing::debug;
use url::Url;

use super::types::{Fetch, FetchError, FormData, Response};

/// Where the site's files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoot {
    /// A local checkout of the static site.
    Dir(PathBuf),
    /// A deployed copy reachable over HTTP(S).
    Http(Url),
}

impl SiteRoot {
    /// `http://` and `https://` roots are remote; anything else is a directory.
    pub fn parse(root: &str) -> Result<Self, FetchError> {
        if root.starts_with("http://") || root.starts_with("https://") {
            let mut url = Url::parse(root).map_err(|_| FetchError::InvalidUrl(root.to_string()))?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ok(Self::Http(url))
        } else {
            Ok(Self::Dir(PathBuf::from(root)))
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Route {
    File { url: String, path: PathBuf },
    Http(Url),
}

pub struct SiteFetcher {
    root: SiteRoot,
    /// Origin the page pretends to be served from.
    origin: Url,
    client: Client,
}

impl SiteFetcher {
    pub fn new(root: SiteRoot, origin: Url) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| FetchError::Network {
                url: origin.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            root,
            origin,
            client,
        })
    }

    pub fn root(&self) -> &SiteRoot {
        &self.root
    }

    pub(super) fn route(&self, url: &str) -> Result<Route, FetchError> {
        let absolute = Url::parse(url)
            .or_else(|_| self.origin.join(url))
            .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        if absolute.origin() != self.origin.origin() {
            return match absolute.scheme() {
                "http" | "https" => Ok(Route::Http(absolute)),
                _ => Err(FetchError::InvalidUrl(url.to_string())),
            };
        }

        let relative = absolute.path().trim_start_matches('/');
        match &self.root {
            SiteRoot::Dir(dir) => Ok(Route::File {
                url: absolute.to_string(),
                path: local_path(dir, relative)
                    .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?,
            }),
            SiteRoot::Http(base) => {
                let mut target = base
                    .join(relative)
                    .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
                target.set_query(absolute.query());
                Ok(Route::Http(target))
            }
        }
    }

    fn network_error(url: &Url, e: reqwest::Error) -> FetchError {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }

    fn read_response(url: &Url, resp: reqwest::blocking::Response) -> Result<Response, FetchError> {
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(|e| Self::network_error(url, e))?;
        Ok(Response::new(url.as_str(), status, body.to_vec()))
    }
}

/// Map a percent-encoded, root-relative URL path onto `dir`.
pub fn local_path(dir: &Path, relative: &str) -> Option<PathBuf> {
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(dir)
    };
    let base = Url::from_directory_path(&dir).ok()?;
    base.join(relative).ok()?.to_file_path().ok()
}

impl Fetch for SiteFetcher {
    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        match self.route(url)? {
            Route::File { url, path } => {
                debug!(path = %path.display(), "reading site file");
                match fs::read(&path) {
                    Ok(body) => Ok(Response::new(url, 200, body)),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(Response::new(url, 404, Vec::new())),
                    Err(source) => Err(FetchError::Io { url, source }),
                }
            }
            Route::Http(target) => {
                debug!(url = %target, "GET");
                let resp = self
                    .client
                    .get(target.clone())
                    .header("Cache-Control", "no-cache")
                    .send()
                    .map_err(|e| Self::network_error(&target, e))?;
                Self::read_response(&target, resp)
            }
        }
    }

    async fn post_form(&self, url: &str, form: &FormData) -> Result<Response, FetchError> {
        let target = match self.route(url)? {
            Route::Http(target) => target,
            Route::File { url, .. } => {
                return Err(FetchError::Network {
                    url,
                    message: "a local site has no form endpoint".to_string(),
                });
            }
        };

        let body = form
            .fields
            .iter()
            .fold(multipart::Form::new(), |body, (name, value)| {
                body.text(name.clone(), value.clone())
            });

        debug!(url = %target, fields = form.fields.len(), "POST form");
        let resp = self
            .client
            .post(target.clone())
            .header("Accept", "application/json")
            .multipart(body)
            .send()
            .map_err(|e| Self::network_error(&target, e))?;
        Self::read_response(&target, resp)
    }
}
