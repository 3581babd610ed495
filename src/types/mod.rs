//! Core data types for GitHub API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A point in time as GitHub reports it.
///
/// Most endpoints emit RFC 3339 strings, but a few legacy fields emit Unix
/// epoch seconds instead; this type accepts either on input and always
/// serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp from Unix epoch seconds.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// The wrapped UTC time.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an RFC 3339 string or Unix epoch seconds")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Timestamp, E>
    where
        E: de::Error,
    {
        Timestamp::from_unix(value)
            .ok_or_else(|| E::custom(format!("epoch seconds out of range: {}", value)))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Timestamp, E>
    where
        E: de::Error,
    {
        let secs = i64::try_from(value)
            .map_err(|_| E::custom(format!("epoch seconds out of range: {}", value)))?;
        self.visit_i64(secs)
    }

    fn visit_str<E>(self, value: &str) -> Result<Timestamp, E>
    where
        E: de::Error,
    {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Timestamp(dt.with_timezone(&Utc)))
            .map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

/// GitHub user (minimal representation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: u64,
    /// Username (login).
    pub login: String,
    /// User node ID.
    pub node_id: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// User type (User, Organization, Bot).
    #[serde(rename = "type")]
    pub user_type: String,
    /// Site admin flag.
    pub site_admin: bool,
    /// Profile URL.
    pub html_url: String,
}

/// GitHub repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Repository ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Repository name.
    pub name: String,
    /// Full name (owner/repo).
    pub full_name: String,
    /// Owner information.
    pub owner: User,
    /// Whether the repository is private.
    pub private: bool,
    /// Repository description.
    pub description: Option<String>,
    /// Whether the repository is a fork.
    pub fork: bool,
    /// HTML URL.
    pub html_url: String,
    /// Clone URL.
    pub clone_url: String,
    /// Default branch.
    pub default_branch: String,
    /// Primary language.
    pub language: Option<String>,
    /// Fork count.
    pub forks_count: u32,
    /// Stargazer count.
    pub stargazers_count: u32,
    /// Open issue count.
    pub open_issues_count: u32,
    /// Topics.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,
    /// License information.
    pub license: Option<License>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
    /// Last push time.
    pub pushed_at: Option<Timestamp>,
}

/// Repository license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    /// License key.
    pub key: String,
    /// License name.
    pub name: String,
    /// SPDX ID.
    pub spdx_id: Option<String>,
    /// License URL.
    pub url: Option<String>,
}

/// Issue or pull request label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Label ID.
    pub id: u64,
    /// Label name.
    pub name: String,
    /// Color (hex, without `#`).
    pub color: String,
    /// Description.
    pub description: Option<String>,
    /// Whether this is a default label.
    #[serde(default)]
    pub default: bool,
}

/// Issue milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone ID.
    pub id: u64,
    /// Milestone number.
    pub number: u32,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// State (open, closed).
    pub state: String,
    /// Open issue count.
    pub open_issues: u32,
    /// Closed issue count.
    pub closed_issues: u32,
    /// Creation time.
    pub created_at: Timestamp,
    /// Due date.
    pub due_on: Option<Timestamp>,
}
