//! Request dispatch
//!
//! Turns the raw bytes of one request into exactly one response:
//! parse, method check, resolve, then redirect / listing / file.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::HttpError;
use crate::files::resolver::decode_path;
use crate::files::{MimeRegistry, ResolvedTarget, Resolver, listing};
use crate::http::parser::parse_request_line;
use crate::http::request::{Method, Request};
use crate::http::response::{HTML_CONTENT_TYPE, Response};

#[derive(Debug, Clone)]
pub struct FileService {
    resolver: Arc<Resolver>,
    file_delay: Duration,
}

impl FileService {
    pub fn new(resolver: Resolver, file_delay: Duration) -> Self {
        Self {
            resolver: Arc::new(resolver),
            file_delay,
        }
    }

    /// Builds the service described by `cfg` with the default MIME table.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let resolver = Resolver::new(
            &cfg.static_files.root,
            &cfg.static_files.allowed_extensions,
            MimeRegistry::default(),
        )?;
        Ok(Self::new(resolver, cfg.server.file_delay()))
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Produces the response for the bytes read from one connection.
    ///
    /// Request-level failures become canned responses. An `Err` means the
    /// blocking filesystem work itself died; the caller drops the connection.
    pub async fn respond(&self, raw: &[u8]) -> anyhow::Result<Response> {
        let request = match parse_request_line(raw) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "Rejecting request");
                return Ok(e.into_response());
            }
        };

        info!(method = request.method.as_str(), target = %request.target, "Request");

        match self.dispatch(&request).await {
            Ok(response) => Ok(response),
            Err(DispatchError::Http(e)) => {
                debug!(error = %e, status = e.status().as_u16(), "Request failed");
                Ok(e.into_response())
            }
            Err(DispatchError::Internal(e)) => Err(e),
        }
    }

    async fn dispatch(&self, request: &Request) -> Result<Response, DispatchError> {
        if request.method != Method::GET {
            return Err(HttpError::UnsupportedMethod(request.method.as_str().to_string()).into());
        }

        let resolver = Arc::clone(&self.resolver);
        let target = request.target.clone();
        let resolved = tokio::task::spawn_blocking(move || resolver.resolve(&target))
            .await
            .map_err(anyhow::Error::from)?;

        match resolved {
            ResolvedTarget::NotFound => Err(HttpError::NotFound.into()),
            ResolvedTarget::Directory(dir) => {
                let path = request.path();
                let shown = decode_path(path);
                if !shown.ends_with('/') {
                    return Ok(Response::moved_permanently(&format!("{path}/")));
                }

                let body = tokio::task::spawn_blocking(move || listing::render(&shown, &dir))
                    .await
                    .map_err(anyhow::Error::from)?;

                Ok(Response::ok(HTML_CONTENT_TYPE, body))
            }
            ResolvedTarget::File { path, content_type } => {
                let body = tokio::fs::read(&path).await.map_err(HttpError::from)?;

                if !self.file_delay.is_zero() {
                    tokio::time::sleep(self.file_delay).await;
                }

                info!(path = %path.display(), content_type = %content_type, "Served");
                Ok(Response::ok(&content_type, body))
            }
        }
    }
}

enum DispatchError {
    Http(HttpError),
    Internal(anyhow::Error),
}

impl From<HttpError> for DispatchError {
    fn from(e: HttpError) -> Self {
        DispatchError::Http(e)
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(e: anyhow::Error) -> Self {
        DispatchError::Internal(e)
    }
}
