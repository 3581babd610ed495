//! GitHub API client implementation.

use crate::config::{GitHubConfig, GitHubConfigBuilder};
use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::pagination::{Page, PageRequest, PaginationLinks};
use crate::services::*;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};

/// GitHub error response format.
#[derive(Debug, serde::Deserialize)]
struct GitHubErrorResponse {
    message: String,
    documentation_url: Option<String>,
}

/// GitHub API client.
///
/// Shared by every service; cheap to borrow, safe to use from multiple
/// tasks.
pub struct GitHubClient {
    /// HTTP client.
    http: Client,
    /// Configuration.
    config: GitHubConfig,
}

impl GitHubClient {
    /// Creates a new GitHub client.
    pub fn new(config: GitHubConfig) -> GitHubResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .build()
            .map_err(|e| {
                GitHubError::new(
                    GitHubErrorKind::InvalidConfiguration,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { http, config })
    }

    /// Creates a new client builder.
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // Service accessors

    /// Gets the repositories service.
    pub fn repositories(&self) -> RepositoriesService<'_> {
        RepositoriesService::new(self)
    }

    /// Gets the issues service.
    pub fn issues(&self) -> IssuesService<'_> {
        IssuesService::new(self)
    }

    /// Gets the pull requests service.
    pub fn pull_requests(&self) -> PullRequestsService<'_> {
        PullRequestsService::new(self)
    }

    /// Gets the users service.
    pub fn users(&self) -> UsersService<'_> {
        UsersService::new(self)
    }

    /// Gets the organizations service.
    pub fn organizations(&self) -> OrganizationsService<'_> {
        OrganizationsService::new(self)
    }

    /// Gets the actions service.
    pub fn actions(&self) -> ActionsService<'_> {
        ActionsService::new(self)
    }

    /// Gets the secret scanning service.
    pub fn secret_scanning(&self) -> SecretScanningService<'_> {
        SecretScanningService::new(self)
    }

    /// Gets the enterprise administration service.
    pub fn enterprise(&self) -> EnterpriseService<'_> {
        EnterpriseService::new(self)
    }

    // HTTP methods

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GitHubResult<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    /// Makes a GET request with query parameters.
    pub async fn get_with_params<T: DeserializeOwned, P: Serialize>(
        &self,
        path: &str,
        params: &P,
    ) -> GitHubResult<T> {
        let url = self.build_url(path)?;
        let full_url = append_query(url, None, params)?;
        let response = self
            .execute_request(Method::GET, &full_url, Option::<&()>::None)
            .await?;
        Self::decode(response).await
    }

    /// Makes a paginated GET request against an endpoint returning a JSON
    /// array.
    ///
    /// Continuation state for the returned [`Page`] is parsed from the Link
    /// response header, covering both page-number and cursor pagination.
    pub async fn get_page<T, P>(
        &self,
        path: &str,
        request: &PageRequest,
        params: &P,
    ) -> GitHubResult<Page<T>>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        self.get_page_with(path, request, params, |items: Vec<T>| (items, None))
            .await
    }

    /// Makes a paginated GET request against an endpoint that wraps its
    /// items, e.g. `{"total_count": 2, "workflow_runs": [...]}`.
    ///
    /// `extract` pulls the item slice and optional total count out of the
    /// decoded wrapper.
    pub async fn get_page_with<W, T, P, F>(
        &self,
        path: &str,
        request: &PageRequest,
        params: &P,
        extract: F,
    ) -> GitHubResult<Page<T>>
    where
        W: DeserializeOwned,
        P: Serialize,
        F: FnOnce(W) -> (Vec<T>, Option<u64>),
    {
        let url = self.build_url(path)?;
        let full_url = append_query(url, Some(request), params)?;
        let response = self
            .execute_request(Method::GET, &full_url, Option::<&()>::None)
            .await?;

        let links = PaginationLinks::from_headers(response.headers());
        let body: W = Self::decode(response).await?;
        let (items, total_count) = extract(body);

        let mut page = Page::new(items, links);
        page.total_count = total_count;
        Ok(page)
    }

    /// Makes a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GitHubResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Makes a POST request without a response body.
    pub async fn post_no_response<B: Serialize>(&self, path: &str, body: &B) -> GitHubResult<()> {
        self.request_no_response(Method::POST, path, Some(body)).await
    }

    /// Makes a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GitHubResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Makes a PUT request without a response body.
    pub async fn put_no_response<B: Serialize>(&self, path: &str, body: &B) -> GitHubResult<()> {
        self.request_no_response(Method::PUT, path, Some(body)).await
    }

    /// Makes a PATCH request.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GitHubResult<T> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> GitHubResult<()> {
        self.request_no_response(Method::DELETE, path, Option::<&()>::None)
            .await
    }

    /// Makes a request and returns the raw response.
    pub async fn raw_request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> GitHubResult<Response> {
        let url = self.build_url(path)?;
        self.execute_request(method, &url, body).await
    }

    // Internal methods

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> GitHubResult<T> {
        let url = self.build_url(path)?;
        let response = self.execute_request(method, &url, body).await?;
        Self::decode(response).await
    }

    async fn request_no_response<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> GitHubResult<()> {
        let url = self.build_url(path)?;
        self.execute_request(method, &url, body).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GitHubResult<T> {
        response.json().await.map_err(|e| {
            GitHubError::deserialization(format!("Failed to deserialize response: {}", e))
        })
    }

    async fn execute_request<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> GitHubResult<Response> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", &self.config.api_version);

        if let Some(token) = &self.config.token {
            request = request.header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                GitHubError::new(
                    GitHubErrorKind::InvalidParameter,
                    format!("Failed to serialize request body: {}", e),
                )
            })?;
            request = request
                .header("Content-Type", "application/json")
                .body(bytes);
        }

        tracing::debug!(method = %method, url = %url, "sending request");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GitHubError::timeout(format!("Request timed out: {}", e))
            } else if e.is_connect() {
                GitHubError::new(
                    GitHubErrorKind::ConnectionFailed,
                    format!("Connection failed: {}", e),
                )
            } else {
                GitHubError::new(GitHubErrorKind::Unknown, format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "request failed");
            return Err(Self::handle_error_response(response).await);
        }

        Ok(response)
    }

    fn build_url(&self, path: &str) -> GitHubResult<String> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(format!("{}/{}", base, path))
    }

    async fn handle_error_response(response: Response) -> GitHubError {
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-github-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let error_body = response.json::<GitHubErrorResponse>().await.ok();

        let message = error_body
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("HTTP {} error", status.as_u16()));

        let documentation_url = error_body.as_ref().and_then(|e| e.documentation_url.clone());

        GitHubError::from_response(status.as_u16(), message, documentation_url, request_id)
    }
}

fn append_query<P: Serialize>(
    url: String,
    request: Option<&PageRequest>,
    params: &P,
) -> GitHubResult<String> {
    let mut query = serde_urlencoded::to_string(params).map_err(|e| {
        GitHubError::new(
            GitHubErrorKind::InvalidParameter,
            format!("Failed to serialize parameters: {}", e),
        )
    })?;

    if let Some((key, value)) = request.and_then(PageRequest::to_query) {
        let pair = serde_urlencoded::to_string([(key, value)]).map_err(|e| {
            GitHubError::new(
                GitHubErrorKind::InvalidParameter,
                format!("Failed to serialize pagination parameter: {}", e),
            )
        })?;
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&pair);
    }

    if query.is_empty() {
        Ok(url)
    } else {
        Ok(format!("{}?{}", url, query))
    }
}

/// Builder for GitHubClient.
pub struct GitHubClientBuilder {
    config_builder: GitHubConfigBuilder,
}

impl GitHubClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: GitHubConfig::builder(),
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.token(token);
        self
    }

    /// Sets the API version header.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_version(version);
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GitHubResult<GitHubClient> {
        let config = self.config_builder.build()?;
        GitHubClient::new(config)
    }
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
