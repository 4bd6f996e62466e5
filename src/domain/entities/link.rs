//! Link entity representing a shared resource filed under categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::category::CategoryRef;
use super::user::Author;

/// Whether the linked resource is free or paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[serde(alias = "Free")]
    Free,
    #[serde(alias = "Paid")]
    Paid,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Free => "free",
            LinkType::Paid => "paid",
        }
    }
}

impl FromStr for LinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(LinkType::Free),
            "paid" => Ok(LinkType::Paid),
            other => Err(format!("unknown link type '{other}'")),
        }
    }
}

/// Format of the linked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    #[serde(alias = "Video")]
    Video,
    #[serde(alias = "Book")]
    Book,
}

impl Medium {
    pub fn as_str(&self) -> &'static str {
        match self {
            Medium::Video => "video",
            Medium::Book => "book",
        }
    }
}

impl FromStr for Medium {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Medium::Video),
            "book" => Ok(Medium::Book),
            other => Err(format!("unknown medium '{other}'")),
        }
    }
}

/// A published link with its categories and author expanded.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub medium: Medium,
    pub categories: Vec<CategoryRef>,
    pub posted_by: Author,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Ids of the categories this link is filed under.
    pub fn category_ids(&self) -> Vec<i64> {
        self.categories.iter().map(|c| c.id).collect()
    }
}

/// Input data for creating a new link.
///
/// The slug is always the URL, so it is not carried separately.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    /// Canonical form of `url`, unique across links.
    pub slug: String,
    pub link_type: LinkType,
    pub medium: Medium,
    pub categories: Vec<i64>,
    pub posted_by: i64,
}

/// Full replacement of a link's editable fields.
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub title: String,
    pub url: String,
    pub slug: String,
    pub link_type: LinkType,
    pub medium: Medium,
    pub categories: Vec<i64>,
}

/// Click counter state for a link id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClickCount {
    pub link_id: i64,
    pub clicks: i64,
}
