//! # GitHub REST Client
//!
//! A strongly-typed GitHub REST API client with:
//! - One service per resource area (Repositories, Issues, PRs, Actions,
//!   Secret Scanning, Enterprise administration, ...)
//! - Uniform lazy pagination over both page-number and cursor endpoints
//! - Flexible timestamp decoding (RFC 3339 strings or Unix epoch integers)
//! - Typed errors with GitHub request IDs and documentation links
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use github_rest::services::RepositoryListOptions;
//! use github_rest::GitHubClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubClient::builder()
//!         .token("ghp_xxxxxxxxxxxx")
//!         .build()?;
//!
//!     // All repositories, one page at a time, fetched lazily.
//!     let options = RepositoryListOptions {
//!         per_page: Some(100),
//!         ..Default::default()
//!     };
//!     let mut repos = client
//!         .repositories()
//!         .scan_for_user("octocat", options)
//!         .into_stream();
//!
//!     while let Some(repo) = repos.next().await {
//!         println!("{}", repo?.full_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod types;

// HTTP client and transport
pub mod client;

// Pagination handling
pub mod pagination;

// API Services
pub mod services;

// Re-exports for convenience
pub use client::{GitHubClient, GitHubClientBuilder};
pub use config::{GitHubConfig, GitHubConfigBuilder};
pub use errors::{GitHubError, GitHubErrorKind, GitHubResult};
pub use pagination::{
    must, ErrorCheck, ItemStream, ListOptions, MustStream, Page, PageIterator, PageRequest,
    PaginationLinks,
};
pub use types::*;
