//! User operations.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::pagination::{ListOptions, Page, PageIterator, PageRequest};
use crate::types::{Timestamp, User};
use serde::{Deserialize, Serialize};

/// Service for user operations.
pub struct UsersService<'a> {
    client: &'a GitHubClient,
}

impl<'a> UsersService<'a> {
    /// Creates a new users service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets the authenticated user.
    pub async fn get_authenticated(&self) -> GitHubResult<AuthenticatedUser> {
        self.client.get("/user").await
    }

    /// Gets a user by username.
    pub async fn get(&self, username: &str) -> GitHubResult<User> {
        self.client.get(&format!("/users/{}", username)).await
    }

    /// Updates the authenticated user.
    pub async fn update(&self, request: &UpdateUserRequest) -> GitHubResult<AuthenticatedUser> {
        self.client.patch("/user", request).await
    }

    /// Lists one page of a user's followers.
    pub async fn list_followers(
        &self,
        username: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<User>> {
        self.client
            .get_page(&format!("/users/{}/followers", username), request, options)
            .await
    }

    /// Iterates over every follower of a user.
    pub fn scan_followers(&self, username: &str, options: ListOptions) -> PageIterator<'a, User> {
        let client = self.client;
        let path = format!("/users/{}/followers", username);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Lists one page of the users a user follows.
    pub async fn list_following(
        &self,
        username: &str,
        request: &PageRequest,
        options: &ListOptions,
    ) -> GitHubResult<Page<User>> {
        self.client
            .get_page(&format!("/users/{}/following", username), request, options)
            .await
    }

    /// Iterates over every user a user follows.
    pub fn scan_following(&self, username: &str, options: ListOptions) -> PageIterator<'a, User> {
        let client = self.client;
        let path = format!("/users/{}/following", username);
        PageIterator::new(move |request| {
            let path = path.clone();
            let options = options.clone();
            Box::pin(async move { client.get_page(&path, &request, &options).await })
        })
    }

    /// Checks if the authenticated user follows a user.
    pub async fn is_following(&self, username: &str) -> GitHubResult<bool> {
        let response = self
            .client
            .raw_request(
                reqwest::Method::GET,
                &format!("/user/following/{}", username),
                Option::<&()>::None,
            )
            .await;

        match response {
            Ok(_) => Ok(true),
            Err(e) if e.status_code() == Some(404) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Follows a user.
    pub async fn follow(&self, username: &str) -> GitHubResult<()> {
        self.client
            .put_no_response(&format!("/user/following/{}", username), &())
            .await
    }

    /// Unfollows a user.
    pub async fn unfollow(&self, username: &str) -> GitHubResult<()> {
        self.client
            .delete(&format!("/user/following/{}", username))
            .await
    }
}

/// Authenticated user with additional fields.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Username.
    pub login: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// Name.
    pub name: Option<String>,
    /// Company.
    pub company: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Bio.
    pub bio: Option<String>,
    /// Public repos count.
    pub public_repos: u32,
    /// Followers count.
    pub followers: u32,
    /// Following count.
    pub following: u32,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

/// Request to update a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    /// Name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Blog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}
