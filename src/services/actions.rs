//! GitHub Actions operations.
//!
//! Actions list endpoints wrap their items in an envelope carrying
//! `total_count`, so the paged methods here go through
//! [`GitHubClient::get_page_with`](crate::client::GitHubClient::get_page_with)
//! rather than the plain array path.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Service for GitHub Actions operations.
pub struct ActionsService<'a> {
    client: &'a GitHubClient,
}

impl<'a> ActionsService<'a> {
    /// Creates a new actions service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets a workflow.
    pub async fn get_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
    ) -> GitHubResult<Workflow> {
        self.client
            .get(&format!(
                "/repos/{}/{}/actions/workflows/{}",
                owner, repo, workflow_id
            ))
            .await
    }

    /// Lists one page of a repository's workflows.
    pub async fn list_workflows(
        &self,
        owner: &str,
        repo: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<Workflow>> {
        self.client
            .get_page_with(
                &format!("/repos/{}/{}/actions/workflows", owner, repo),
                request,
                options,
                |body: WorkflowList| (body.workflows, Some(body.total_count)),
            )
            .await
    }

    /// Iterates over every workflow of a repository.
    pub fn scan_workflows(
        &self,
        owner: &str,
        repo: &str,
        options: ListOptions,
    ) -> PageIterator<'a, Workflow> {
        let client = self.client;
        let path = format!("/repos/{}/{}/actions/workflows", owner, repo);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move {
                client
                    .get_page_with(&path, &request, &options, |body: WorkflowList| {
                        (body.workflows, Some(body.total_count))
                    })
                    .await
            })
        })
    }

    /// Triggers a workflow dispatch event.
    pub async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        request: &DispatchWorkflowRequest,
    ) -> GitHubResult<()> {
        self.client
            .post_no_response(
                &format!(
                    "/repos/{}/{}/actions/workflows/{}/dispatches",
                    owner, repo, workflow_id
                ),
                request,
            )
            .await
    }

    /// Lists one page of a repository's workflow runs.
    pub async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        request: &PageRequest,
        options: &WorkflowRunListOptions,
    ) -> GitHubResult<Page<WorkflowRun>> {
        self.client
            .get_page_with(
                &format!("/repos/{}/{}/actions/runs", owner, repo),
                request,
                options,
                |body: WorkflowRunList| (body.workflow_runs, Some(body.total_count)),
            )
            .await
    }

    /// Iterates over every workflow run matching the options.
    pub fn scan_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        options: WorkflowRunListOptions,
    ) -> PageIterator<'a, WorkflowRun> {
        let client = self.client;
        let path = format!("/repos/{}/{}/actions/runs", owner, repo);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move {
                client
                    .get_page_with(&path, &request, &options, |body: WorkflowRunList| {
                        (body.workflow_runs, Some(body.total_count))
                    })
                    .await
            })
        })
    }

    /// Cancels a workflow run.
    pub async fn cancel_run(&self, owner: &str, repo: &str, run_id: u64) -> GitHubResult<()> {
        self.client
            .post_no_response(
                &format!("/repos/{}/{}/actions/runs/{}/cancel", owner, repo, run_id),
                &(),
            )
            .await
    }

    /// Re-runs a workflow run.
    pub async fn rerun(&self, owner: &str, repo: &str, run_id: u64) -> GitHubResult<()> {
        self.client
            .post_no_response(
                &format!("/repos/{}/{}/actions/runs/{}/rerun", owner, repo, run_id),
                &(),
            )
            .await
    }

    /// Gets an artifact.
    pub async fn get_artifact(
        &self,
        owner: &str,
        repo: &str,
        artifact_id: u64,
    ) -> GitHubResult<Artifact> {
        self.client
            .get(&format!(
                "/repos/{}/{}/actions/artifacts/{}",
                owner, repo, artifact_id
            ))
            .await
    }

    /// Deletes an artifact.
    pub async fn delete_artifact(
        &self,
        owner: &str,
        repo: &str,
        artifact_id: u64,
    ) -> GitHubResult<()> {
        self.client
            .delete(&format!(
                "/repos/{}/{}/actions/artifacts/{}",
                owner, repo, artifact_id
            ))
            .await
    }

    /// Lists one page of a repository's artifacts.
    pub async fn list_artifacts(
        &self,
        owner: &str,
        repo: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<Artifact>> {
        self.client
            .get_page_with(
                &format!("/repos/{}/{}/actions/artifacts", owner, repo),
                request,
                options,
                |body: ArtifactList| (body.artifacts, Some(body.total_count)),
            )
            .await
    }

    /// Iterates over every artifact of a repository.
    pub fn scan_artifacts(
        &self,
        owner: &str,
        repo: &str,
        options: ListOptions,
    ) -> PageIterator<'a, Artifact> {
        let client = self.client;
        let path = format!("/repos/{}/{}/actions/artifacts", owner, repo);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move {
                client
                    .get_page_with(&path, &request, &options, |body: ArtifactList| {
                        (body.artifacts, Some(body.total_count))
                    })
                    .await
            })
        })
    }
}

/// GitHub Actions workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    /// Workflow ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Name.
    pub name: String,
    /// Path within the repository.
    pub path: String,
    /// State (active, disabled_manually, ...).
    pub state: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct WorkflowList {
    total_count: u64,
    workflows: Vec<Workflow>,
}

/// GitHub Actions workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    /// Run ID.
    pub id: u64,
    /// Run name.
    pub name: Option<String>,
    /// Head branch.
    pub head_branch: Option<String>,
    /// Head commit SHA.
    pub head_sha: String,
    /// Run number.
    pub run_number: u64,
    /// Triggering event.
    pub event: String,
    /// Status (queued, in_progress, completed).
    pub status: Option<String>,
    /// Conclusion (success, failure, cancelled, ...).
    pub conclusion: Option<String>,
    /// Workflow ID.
    pub workflow_id: u64,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunList {
    total_count: u64,
    workflow_runs: Vec<WorkflowRun>,
}

/// Workflow run artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    /// Artifact ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Name.
    pub name: String,
    /// Size in bytes.
    pub size_in_bytes: u64,
    /// Download URL.
    pub archive_download_url: String,
    /// Whether the artifact has expired.
    pub expired: bool,
    /// Creation time.
    pub created_at: Timestamp,
    /// Expiry time.
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
struct ArtifactList {
    total_count: u64,
    artifacts: Vec<Artifact>,
}

/// Options for listing workflow runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowRunListOptions {
    /// Filter by branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Filter by triggering event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Filter by status or conclusion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Filter by actor login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to dispatch a workflow.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchWorkflowRequest {
    /// Git reference to run on.
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Workflow inputs.
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub inputs: HashMap<String, Value>,
}
