//! Pull request operations.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::types::{Timestamp, User};
use serde::{Deserialize, Serialize};

/// Service for pull request operations.
pub struct PullRequestsService<'a> {
    client: &'a GitHubClient,
}

impl<'a> PullRequestsService<'a> {
    /// Creates a new pull requests service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets a pull request.
    pub async fn get(&self, owner: &str, repo: &str, number: u64) -> GitHubResult<PullRequest> {
        self.client
            .get(&format!("/repos/{}/{}/pulls/{}", owner, repo, number))
            .await
    }

    /// Creates a pull request.
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        request: &CreatePullRequestRequest,
    ) -> GitHubResult<PullRequest> {
        self.client
            .post(&format!("/repos/{}/{}/pulls", owner, repo), request)
            .await
    }

    /// Merges a pull request.
    pub async fn merge(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &MergePullRequestRequest,
    ) -> GitHubResult<MergeResult> {
        self.client
            .put(
                &format!("/repos/{}/{}/pulls/{}/merge", owner, repo, number),
                request,
            )
            .await
    }

    /// Lists one page of a repository's pull requests.
    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        request: &PageRequest,
        options: &PullRequestListOptions,
    ) -> GitHubResult<Page<PullRequest>> {
        self.client
            .get_page(&format!("/repos/{}/{}/pulls", owner, repo), request, options)
            .await
    }

    /// Iterates over every pull request matching the options.
    pub fn scan(
        &self,
        owner: &str,
        repo: &str,
        options: PullRequestListOptions,
    ) -> PageIterator<'a, PullRequest> {
        let client = self.client;
        let path = format!("/repos/{}/{}/pulls", owner, repo);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of the files changed by a pull request.
    pub async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<PullRequestFile>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/pulls/{}/files", owner, repo, number),
                request,
                options,
            )
            .await
    }

    /// Iterates over every file changed by a pull request.
    pub fn scan_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: ListOptions,
    ) -> PageIterator<'a, PullRequestFile> {
        let client = self.client;
        let path = format!("/repos/{}/{}/pulls/{}/files", owner, repo, number);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }
}

/// GitHub pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// Pull request ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Pull request number.
    pub number: u64,
    /// State (open, closed).
    pub state: String,
    /// Title.
    pub title: String,
    /// Body.
    pub body: Option<String>,
    /// Author.
    pub user: User,
    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,
    /// Head branch reference.
    pub head: PullRequestRef,
    /// Base branch reference.
    pub base: PullRequestRef,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
    /// Merge time.
    pub merged_at: Option<Timestamp>,
}

/// Branch reference in a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
    /// Label (owner:branch).
    pub label: String,
    /// Branch name.
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit SHA.
    pub sha: String,
}

/// Changed file in a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestFile {
    /// File SHA.
    pub sha: Option<String>,
    /// File path.
    pub filename: String,
    /// Change status (added, removed, modified, renamed, ...).
    pub status: String,
    /// Added line count.
    pub additions: u32,
    /// Removed line count.
    pub deletions: u32,
    /// Total change count.
    pub changes: u32,
    /// Patch hunk, when available.
    pub patch: Option<String>,
}

/// Options for listing pull requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullRequestListOptions {
    /// Filter by state (open, closed, all).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Filter by head (user:ref-name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Filter by base branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Sort field (created, updated, popularity, long-running).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort direction (asc, desc).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequestRequest {
    /// Title.
    pub title: String,
    /// Head branch (user:ref-name or ref-name).
    pub head: String,
    /// Base branch.
    pub base: String,
    /// Body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether to open as draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
}

/// Request to merge a pull request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergePullRequestRequest {
    /// Commit title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_title: Option<String>,
    /// Commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    /// Merge method (merge, squash, rebase).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<String>,
}

/// Result of merging a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeResult {
    /// Merge commit SHA.
    pub sha: Option<String>,
    /// Whether the merge succeeded.
    pub merged: bool,
    /// Result message.
    pub message: String,
}
