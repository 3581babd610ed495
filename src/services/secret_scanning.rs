//! Secret scanning operations.
//!
//! Alert list endpoints paginate with opaque cursors: the next link carries
//! an `after` token rather than a page number, and the scan methods follow
//! it transparently.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::types::{Timestamp, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Service for secret scanning operations.
pub struct SecretScanningService<'a> {
    client: &'a GitHubClient,
}

impl<'a> SecretScanningService<'a> {
    /// Creates a new secret scanning service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets a secret scanning alert.
    pub async fn get_alert(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> GitHubResult<SecretScanningAlert> {
        self.client
            .get(&format!(
                "/repos/{}/{}/secret-scanning/alerts/{}",
                owner, repo, number
            ))
            .await
    }

    /// Updates the state of a secret scanning alert.
    pub async fn update_alert(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &UpdateAlertRequest,
    ) -> GitHubResult<SecretScanningAlert> {
        self.client
            .patch(
                &format!(
                    "/repos/{}/{}/secret-scanning/alerts/{}",
                    owner, repo, number
                ),
                request,
            )
            .await
    }

    /// Lists one page of a repository's secret scanning alerts.
    pub async fn list_alerts_for_repo(
        &self,
        owner: &str,
        repo: &str,
        request: &PageRequest,
        options: &AlertListOptions,
    ) -> GitHubResult<Page<SecretScanningAlert>> {
        self.client
            .get_page(
                &format!("/repos/{}/{}/secret-scanning/alerts", owner, repo),
                request,
                options,
            )
            .await
    }

    /// Iterates over every secret scanning alert of a repository.
    pub fn scan_alerts_for_repo(
        &self,
        owner: &str,
        repo: &str,
        options: AlertListOptions,
    ) -> PageIterator<'a, SecretScanningAlert> {
        let client = self.client;
        let path = format!("/repos/{}/{}/secret-scanning/alerts", owner, repo);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of an organization's secret scanning alerts.
    pub async fn list_alerts_for_org(
        &self,
        org: &str,
        request: &PageRequest,
        options: &AlertListOptions,
    ) -> GitHubResult<Page<SecretScanningAlert>> {
        self.client
            .get_page(
                &format!("/orgs/{}/secret-scanning/alerts", org),
                request,
                options,
            )
            .await
    }

    /// Iterates over every secret scanning alert of an organization.
    pub fn scan_alerts_for_org(
        &self,
        org: &str,
        options: AlertListOptions,
    ) -> PageIterator<'a, SecretScanningAlert> {
        let client = self.client;
        let path = format!("/orgs/{}/secret-scanning/alerts", org);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of an alert's detected locations.
    pub async fn list_locations(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<AlertLocation>> {
        self.client
            .get_page(
                &format!(
                    "/repos/{}/{}/secret-scanning/alerts/{}/locations",
                    owner, repo, number
                ),
                request,
                options,
            )
            .await
    }

    /// Iterates over every detected location of an alert.
    pub fn scan_locations(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: ListOptions,
    ) -> PageIterator<'a, AlertLocation> {
        let client = self.client;
        let path = format!(
            "/repos/{}/{}/secret-scanning/alerts/{}/locations",
            owner, repo, number
        );
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }
}

/// Secret scanning alert.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretScanningAlert {
    /// Alert number, unique within the repository.
    pub number: u64,
    /// State (open, resolved).
    pub state: String,
    /// Detected secret type.
    pub secret_type: String,
    /// Human-readable secret type.
    pub secret_type_display_name: Option<String>,
    /// The detected secret value.
    pub secret: Option<String>,
    /// Resolution (false_positive, wont_fix, revoked, used_in_tests).
    pub resolution: Option<String>,
    /// Resolution time.
    pub resolved_at: Option<Timestamp>,
    /// Who resolved the alert.
    pub resolved_by: Option<User>,
    /// HTML URL.
    pub html_url: String,
    /// API URL for the alert's locations.
    pub locations_url: Option<String>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Option<Timestamp>,
}

/// Detected location of a secret.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertLocation {
    /// Location type (commit, issue_title, issue_body, ...).
    #[serde(rename = "type")]
    pub location_type: String,
    /// Type-specific location details.
    pub details: Value,
}

/// Options for listing secret scanning alerts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertListOptions {
    /// Filter by state (open, resolved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Comma-separated secret types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    /// Filter by resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Sort field (created, updated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort direction (asc, desc).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to update a secret scanning alert.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateAlertRequest {
    /// New state (open, resolved).
    pub state: String,
    /// Resolution, required when resolving.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_deserialization() {
        let json = serde_json::json!({
            "number": 42,
            "state": "resolved",
            "secret_type": "github_personal_access_token",
            "secret_type_display_name": "GitHub Personal Access Token",
            "secret": "ghp_xxxx",
            "resolution": "revoked",
            "resolved_at": "2020-11-16T22:42:07Z",
            "resolved_by": null,
            "html_url": "https://github.com/o/r/security/secret-scanning/42",
            "locations_url": "https://api.github.com/repos/o/r/secret-scanning/alerts/42/locations",
            "created_at": "2020-11-06T18:18:30Z",
            "updated_at": null
        });

        let alert: SecretScanningAlert = serde_json::from_value(json).unwrap();
        assert_eq!(alert.number, 42);
        assert_eq!(alert.resolution.as_deref(), Some("revoked"));
        assert!(alert.updated_at.is_none());
    }

    #[test]
    fn test_location_details_stay_opaque() {
        let json = serde_json::json!({
            "type": "commit",
            "details": {
                "path": "/config.txt",
                "start_line": 1,
                "blob_sha": "af5626b"
            }
        });

        let location: AlertLocation = serde_json::from_value(json).unwrap();
        assert_eq!(location.location_type, "commit");
        assert_eq!(location.details["path"], "/config.txt");
    }
}
