//! Issue operations.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::types::{Label, Milestone, Timestamp, User};
use serde::{Deserialize, Serialize};

/// Service for issue operations.
pub struct IssuesService<'a> {
    client: &'a GitHubClient,
}

impl<'a> IssuesService<'a> {
    /// Creates a new issues service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets an issue.
    pub async fn get(&self, owner: &str, repo: &str, number: u64) -> GitHubResult<Issue> {
        self.client
            .get(&format!("/repos/{}/{}/issues/{}", owner, repo, number))
            .await
    }

    /// Creates an issue.
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        request: &CreateIssueRequest,
    ) -> GitHubResult<Issue> {
        self.client
            .post(&format!("/repos/{}/{}/issues", owner, repo), request)
            .await
    }

    /// Updates an issue.
    pub async fn update(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &UpdateIssueRequest,
    ) -> GitHubResult<Issue> {
        self.client
            .patch(
                &format!("/repos/{}/{}/issues/{}", owner, repo, number),
                request,
            )
            .await
    }

    /// Lists one page of a repository's issues.
    pub async fn list_for_repo(
        &self,
        owner: &str,
        repo: &str,
        request: &PageRequest,
        options: &IssueListOptions,
    ) -> GitHubResult<Page<Issue>> {
        self.client
            .get_page(&format!("/repos/{}/{}/issues", owner, repo), request, options)
            .await
    }

    /// Iterates over every issue of a repository matching the options.
    pub fn scan_for_repo(
        &self,
        owner: &str,
        repo: &str,
        options: IssueListOptions,
    ) -> PageIterator<'a, Issue> {
        let client = self.client;
        let path = format!("/repos/{}/{}/issues", owner, repo);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of an issue's comments.
    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<IssueComment>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/issues/{}/comments", owner, repo, number),
                request,
                options,
            )
            .await
    }

    /// Iterates over every comment of an issue.
    pub fn scan_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: ListOptions,
    ) -> PageIterator<'a, IssueComment> {
        let client = self.client;
        let path = format!("/repos/{}/{}/issues/{}/comments", owner, repo, number);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }
}

/// GitHub issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Issue ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Issue number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Body.
    pub body: Option<String>,
    /// State (open, closed).
    pub state: String,
    /// Author.
    pub user: User,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Assignees.
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Milestone.
    pub milestone: Option<Milestone>,
    /// Comment count.
    pub comments: u32,
    /// Whether the conversation is locked.
    #[serde(default)]
    pub locked: bool,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
    /// Close time.
    pub closed_at: Option<Timestamp>,
}

/// Issue comment.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    /// Comment ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Body.
    pub body: String,
    /// Author.
    pub user: User,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

/// Options for listing issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueListOptions {
    /// Filter by state (open, closed, all).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Comma-separated label names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Filter by assignee login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Filter by creator login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Sort field (created, updated, comments).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort direction (asc, desc).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Only issues updated at or after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<Timestamp>,
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create an issue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateIssueRequest {
    /// Title.
    pub title: String,
    /// Body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Assignee logins.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub assignees: Vec<String>,
    /// Label names.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub labels: Vec<String>,
    /// Milestone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

/// Request to update an issue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateIssueRequest {
    /// Title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// State (open, closed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Label names, replacing the current set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}
