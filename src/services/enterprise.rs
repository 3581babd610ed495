//! Enterprise administration operations.
//!
//! The audit log paginates with opaque cursors; runner listings wrap their
//! items in a `total_count` envelope.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::services::organizations::Organization;
use serde::{Deserialize, Serialize};

/// Service for enterprise administration operations.
pub struct EnterpriseService<'a> {
    client: &'a GitHubClient,
}

impl<'a> EnterpriseService<'a> {
    /// Creates a new enterprise service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Lists one page of an enterprise's audit log.
    pub async fn list_audit_log(
        &self,
        enterprise: &str,
        request: &PageRequest,
        options: &AuditLogOptions,
    ) -> GitHubResult<Page<AuditLogEvent>> {
        self.client
            .get_page(
                &format!("/enterprises/{}/audit-log", enterprise),
                request,
                options,
            )
            .await
    }

    /// Iterates over every audit log event matching the options.
    pub fn scan_audit_log(
        &self,
        enterprise: &str,
        options: AuditLogOptions,
    ) -> PageIterator<'a, AuditLogEvent> {
        let client = self.client;
        let path = format!("/enterprises/{}/audit-log", enterprise);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of an enterprise's organizations.
    pub async fn list_organizations(
        &self,
        enterprise: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<Organization>> {
        self.client
            .get_page(
                &format!("/enterprises/{}/organizations", enterprise),
                request,
                options,
            )
            .await
    }

    /// Iterates over every organization of an enterprise.
    pub fn scan_organizations(
        &self,
        enterprise: &str,
        options: ListOptions,
    ) -> PageIterator<'a, Organization> {
        let client = self.client;
        let path = format!("/enterprises/{}/organizations", enterprise);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Gets license consumption for an enterprise.
    pub async fn get_consumed_licenses(
        &self,
        enterprise: &str,
    ) -> GitHubResult<ConsumedLicenses> {
        self.client
            .get(&format!("/enterprises/{}/consumed-licenses", enterprise))
            .await
    }

    /// Gets a self-hosted runner registered to an enterprise.
    pub async fn get_runner(&self, enterprise: &str, runner_id: u64) -> GitHubResult<Runner> {
        self.client
            .get(&format!(
                "/enterprises/{}/actions/runners/{}",
                enterprise, runner_id
            ))
            .await
    }

    /// Removes a self-hosted runner from an enterprise.
    pub async fn delete_runner(&self, enterprise: &str, runner_id: u64) -> GitHubResult<()> {
        self.client
            .delete(&format!(
                "/enterprises/{}/actions/runners/{}",
                enterprise, runner_id
            ))
            .await
    }

    /// Lists one page of an enterprise's self-hosted runners.
    pub async fn list_runners(
        &self,
        enterprise: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<Runner>> {
        self.client
            .get_page_with(
                &format!("/enterprises/{}/actions/runners", enterprise),
                request,
                options,
                |body: RunnerList| (body.runners, Some(body.total_count)),
            )
            .await
    }

    /// Iterates over every self-hosted runner of an enterprise.
    pub fn scan_runners(
        &self,
        enterprise: &str,
        options: ListOptions,
    ) -> PageIterator<'a, Runner> {
        let client = self.client;
        let path = format!("/enterprises/{}/actions/runners", enterprise);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move {
                client
                    .get_page_with(&path, &request, &options, |body: RunnerList| {
                        (body.runners, Some(body.total_count))
                    })
                    .await
            })
        })
    }
}

/// Audit log event.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogEvent {
    /// Event time, milliseconds since the Unix epoch.
    #[serde(rename = "@timestamp")]
    pub timestamp_ms: i64,
    /// Action name (e.g. `repo.create`).
    pub action: String,
    /// Acting user login.
    #[serde(default)]
    pub actor: Option<String>,
    /// Organization login.
    #[serde(default)]
    pub org: Option<String>,
    /// Repository full name.
    #[serde(default)]
    pub repo: Option<String>,
}

/// Options for querying the audit log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditLogOptions {
    /// Search phrase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
    /// Event types to include (web, git, all).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Sort order (asc, desc).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// License consumption for an enterprise.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumedLicenses {
    /// Seats consumed.
    pub total_seats_consumed: u64,
    /// Seats purchased.
    pub total_seats_purchased: u64,
}

/// Self-hosted runner.
#[derive(Debug, Clone, Deserialize)]
pub struct Runner {
    /// Runner ID.
    pub id: u64,
    /// Runner name.
    pub name: String,
    /// Operating system.
    pub os: String,
    /// Status (online, offline).
    pub status: String,
    /// Whether the runner is executing a job.
    pub busy: bool,
    /// Runner labels.
    #[serde(default)]
    pub labels: Vec<RunnerLabel>,
}

/// Label attached to a self-hosted runner.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerLabel {
    /// Label name.
    pub name: String,
    /// Label type (read-only, custom).
    #[serde(rename = "type", default)]
    pub label_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunnerList {
    total_count: u64,
    runners: Vec<Runner>,
}
