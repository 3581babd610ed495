//! Organization operations.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::types::{Timestamp, User};
use serde::{Deserialize, Serialize};

/// Service for organization operations.
pub struct OrganizationsService<'a> {
    client: &'a GitHubClient,
}

impl<'a> OrganizationsService<'a> {
    /// Creates a new organizations service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets an organization.
    pub async fn get(&self, org: &str) -> GitHubResult<Organization> {
        self.client.get(&format!("/orgs/{}", org)).await
    }

    /// Updates an organization.
    pub async fn update(
        &self,
        org: &str,
        request: &UpdateOrganizationRequest,
    ) -> GitHubResult<Organization> {
        self.client.patch(&format!("/orgs/{}", org), request).await
    }

    /// Lists one page of a user's public organization memberships.
    pub async fn list_for_user(
        &self,
        username: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<Organization>> {
        self.client
            .get_page(&format!("/users/{}/orgs", username), request, options)
            .await
    }

    /// Iterates over every public organization of a user.
    pub fn scan_for_user(
        &self,
        username: &str,
        options: ListOptions,
    ) -> PageIterator<'a, Organization> {
        let client = self.client;
        let path = format!("/users/{}/orgs", username);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of the authenticated user's organization memberships.
    pub async fn list_for_authenticated(
        &self,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<Organization>> {
        self.client.get_page("/user/orgs", request, options).await
    }

    /// Iterates over every organization of the authenticated user.
    pub fn scan_for_authenticated(&self, options: ListOptions) -> PageIterator<'a, Organization> {
        let client = self.client;
        PageIterator::new(move |request| {
            let options = options.clone();
            Box::pin(async move { client.get_page("/user/orgs", &request, &options).await })
        })
    }

    /// Lists one page of an organization's members.
    pub async fn list_members(
        &self,
        org: &str,
        request: &PageRequest,
        options: &MemberListOptions,
    ) -> GitHubResult<Page<User>> {
        self.client
            .get_page(&format!("/orgs/{}/members", org), request, options)
            .await
    }

    /// Iterates over every member of an organization.
    pub fn scan_members(&self, org: &str, options: MemberListOptions) -> PageIterator<'a, User> {
        let client = self.client;
        let path = format!("/orgs/{}/members", org);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Checks if a user is a member of an organization.
    pub async fn is_member(&self, org: &str, username: &str) -> GitHubResult<bool> {
        let response = self
            .client
            .raw_request(
                reqwest::Method::GET,
                &format!("/orgs/{}/members/{}", org, username),
                Option::<&()>::None,
            )
            .await;

        match response {
            Ok(_) => Ok(true),
            Err(e) if e.status_code() == Some(404) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Removes a member from an organization.
    pub async fn remove_member(&self, org: &str, username: &str) -> GitHubResult<()> {
        self.client
            .delete(&format!("/orgs/{}/members/{}", org, username))
            .await
    }
}

/// GitHub organization.
///
/// The detail fields are only present on the single-organization endpoint;
/// list endpoints return the summary shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    /// Organization ID.
    pub id: u64,
    /// Login.
    pub login: String,
    /// Node ID.
    pub node_id: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// Description.
    pub description: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Company.
    #[serde(default)]
    pub company: Option<String>,
    /// Location.
    #[serde(default)]
    pub location: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Public repository count.
    #[serde(default)]
    pub public_repos: Option<u32>,
    /// Follower count.
    #[serde(default)]
    pub followers: Option<u32>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Request to update an organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateOrganizationRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Default repository permission (read, write, admin, none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_repository_permission: Option<String>,
}

/// Options for listing organization members.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberListOptions {
    /// Filter (2fa_disabled, all).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Role filter (all, admin, member).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}
