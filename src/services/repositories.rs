//! Repository operations.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::types::Repository;
use serde::{Deserialize, Serialize};

/// Service for repository operations.
pub struct RepositoriesService<'a> {
    client: &'a GitHubClient,
}

impl<'a> RepositoriesService<'a> {
    /// Creates a new repositories service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets a repository.
    pub async fn get(&self, owner: &str, repo: &str) -> GitHubResult<Repository> {
        self.client.get(&format!("/repos/{}/{}", owner, repo)).await
    }

    /// Creates a repository for the authenticated user.
    pub async fn create(&self, request: &CreateRepositoryRequest) -> GitHubResult<Repository> {
        self.client.post("/user/repos", request).await
    }

    /// Deletes a repository.
    pub async fn delete(&self, owner: &str, repo: &str) -> GitHubResult<()> {
        self.client
            .delete(&format!("/repos/{}/{}", owner, repo))
            .await
    }

    /// Lists one page of a user's repositories.
    pub async fn list_for_user(
        &self,
        username: &str,
        request: &PageRequest,
        options: &RepositoryListOptions,
    ) -> GitHubResult<Page<Repository>> {
        self.client
            .get_page(&format!("/users/{}/repos", username), request, options)
            .await
    }

    /// Lists one page of an organization's repositories.
    pub async fn list_for_org(
        &self,
        org: &str,
        request: &PageRequest,
        options: &RepositoryListOptions,
    ) -> GitHubResult<Page<Repository>> {
        self.client
            .get_page(&format!("/orgs/{}/repos", org), request, options)
            .await
    }

    /// Lists one page of the authenticated user's repositories.
    pub async fn list_for_authenticated(
        &self,
        request: &PageRequest,
        options: &RepositoryListOptions,
    ) -> GitHubResult<Page<Repository>> {
        self.client.get_page("/user/repos", request, options).await
    }

    /// Iterates over every repository of a user.
    pub fn scan_for_user(
        &self,
        username: &str,
        options: RepositoryListOptions,
    ) -> PageIterator<'a, Repository> {
        let client = self.client;
        let path = format!("/users/{}/repos", username);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Iterates over every repository of an organization.
    pub fn scan_for_org(
        &self,
        org: &str,
        options: RepositoryListOptions,
    ) -> PageIterator<'a, Repository> {
        let client = self.client;
        let path = format!("/orgs/{}/repos", org);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of a repository's branches.
    pub async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<Branch>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/branches", owner, repo),
                request,
                options,
            )
            .await
    }

    /// Iterates over every branch of a repository.
    pub fn scan_branches(
        &self,
        owner: &str,
        repo: &str,
        options: ListOptions,
    ) -> PageIterator<'a, Branch> {
        let client = self.client;
        let path = format!("/repos/{}/{}/branches", owner, repo);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }
}

/// Options for listing repositories.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepositoryListOptions {
    /// Filter by type (all, owner, member).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<String>,
    /// Sort field (created, updated, pushed, full_name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort direction (asc, desc).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create a repository.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateRepositoryRequest {
    /// Repository name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the repository is private.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Whether to create an initial commit with a README.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    /// Default branch name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

/// Repository branch.
#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Head commit.
    pub commit: BranchCommit,
    /// Whether the branch is protected.
    #[serde(default)]
    pub protected: bool,
}

/// Commit reference at the head of a branch.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchCommit {
    /// Commit SHA.
    pub sha: String,
    /// API URL for the commit.
    pub url: String,
}
