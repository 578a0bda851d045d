//! [`ContentsApi`] over the GitHub REST API using `reqwest`.
//!
//! - Construct with [`GitHubClient::new`] from a [`PublishConfig`].
//! - Every request carries a bearer token, the versioned `Accept` header and
//!   a `User-Agent` (GitHub rejects requests without one).
//! - Path segments are percent-encoded, so file names with spaces or `#`
//!   address the right object.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode, Url};
use tracing::{debug, error, info, warn};

use crate::config::{PublishConfig, Secret};
use crate::contract::{
    ApiError, ContentsApi, NewRepository, PutContentRequest, RemoteFile, RepositoryCreation,
};

pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("gh-publish/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    token: Secret,
}

impl GitHubClient {
    /// # Errors
    /// Fails if the HTTP client cannot be built (e.g. TLS backend initialisation).
    pub fn new(config: &PublishConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport {
                url: config.api_url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        info!(api_url = %config.api_url, repository = %config.credentials.full_name(), "[API] Initialised GitHub client");
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            owner: config.credentials.owner.clone(),
            repo: config.credentials.repo.clone(),
            token: config.credentials.token.clone(),
        })
    }

    /// `api_url` joined with `segments`, each percent-encoded.
    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.api_url).map_err(|e| ApiError::Url {
            url: self.api_url.clone(),
            message: e.to_string(),
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|()| ApiError::Url {
                url: self.api_url.clone(),
                message: "base url cannot have path segments".to_string(),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn contents_url(&self, remote_path: &str) -> Result<Url, ApiError> {
        let base = ["repos", self.owner.as_str(), self.repo.as_str(), "contents"];
        self.endpoint(base.into_iter().chain(remote_path.split('/')))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.token.expose())
            .header(ACCEPT, GITHUB_ACCEPT)
    }

    fn transport_error(&self, url: &Url, e: &reqwest::Error) -> ApiError {
        ApiError::Transport {
            url: url.to_string(),
            message: self.token.redact(&e.to_string()),
        }
    }
}

async fn body_text(resp: reqwest::Response) -> String {
    resp.text()
        .await
        .unwrap_or_else(|_| String::from("<Failed to decode response body>"))
}

#[async_trait]
impl ContentsApi for GitHubClient {
    async fn create_repository(&self, req: NewRepository) -> Result<RepositoryCreation, ApiError> {
        let url = self.endpoint(["user", "repos"])?;
        info!(name = %req.name, private = req.private, "[API] Creating repository");

        let resp = self
            .authorized(self.http.post(url.clone()))
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "[API] Repository creation request failed");
                self.transport_error(&url, &e)
            })?;

        let status = resp.status();
        let outcome = match status {
            StatusCode::CREATED => RepositoryCreation::Created,
            StatusCode::UNPROCESSABLE_ENTITY => RepositoryCreation::AlreadyExists,
            other => {
                let text = body_text(resp).await;
                warn!(status = %other, body = %text, "[API] Unexpected repository creation status");
                RepositoryCreation::Other(other.as_u16())
            }
        };
        info!(?outcome, "[API] Repository creation finished");
        Ok(outcome)
    }

    async fn get_file(&self, path: &str, branch: &str) -> Result<Option<RemoteFile>, ApiError> {
        let mut url = self.contents_url(path)?;
        url.query_pairs_mut().append_pair("ref", branch);
        debug!(path, branch, "[API] Looking up remote file");

        let resp = self
            .authorized(self.http.get(url.clone()))
            .send()
            .await
            .map_err(|e| self.transport_error(&url, &e))?;

        match resp.status() {
            StatusCode::OK => {
                let file: RemoteFile = resp.json().await.map_err(|e| ApiError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                debug!(path, sha = %file.sha, "[API] Remote file exists");
                Ok(Some(file))
            }
            StatusCode::NOT_FOUND => {
                debug!(path, "[API] Remote file not found");
                Ok(None)
            }
            status => {
                let body = body_text(resp).await;
                error!(path, %status, "[API] Remote file lookup failed");
                Err(ApiError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn put_file(&self, path: &str, req: PutContentRequest) -> Result<(), ApiError> {
        let url = self.contents_url(path)?;
        debug!(path, update = req.sha.is_some(), "[API] Writing remote file");

        let resp = self
            .authorized(self.http.put(url.clone()))
            .json(&req)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, &e))?;

        let status = resp.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            info!(path, %status, "[API] Remote file written");
            return Ok(());
        }
        let body = body_text(resp).await;
        error!(path, %status, body = %body, "[API] Remote file write rejected");
        Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}
