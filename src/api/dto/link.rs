//! DTOs for link endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::application::services::LinkDraft;
use crate::domain::entities::{LinkType, Medium};

fn default_link_type() -> LinkType {
    LinkType::Free
}

fn default_medium() -> Medium {
    Medium::Video
}

/// Body of `POST /link` and the link update routes.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkRequest {
    #[validate(length(min = 1, max = 256, message = "Title is required"))]
    pub title: String,

    #[validate(url(message = "Must be a valid URL"))]
    pub url: String,

    #[validate(length(min = 1, message = "Pick at least one category"))]
    pub categories: Vec<i64>,

    #[serde(rename = "type", default = "default_link_type")]
    pub link_type: LinkType,

    #[serde(default = "default_medium")]
    pub medium: Medium,
}

impl From<LinkRequest> for LinkDraft {
    fn from(req: LinkRequest) -> Self {
        LinkDraft {
            title: req.title,
            url: req.url,
            link_type: req.link_type,
            medium: req.medium,
            categories: req.categories,
        }
    }
}

/// Body of `POST /click-count`.
#[derive(Debug, Deserialize, Validate)]
pub struct ClickCountRequest {
    #[serde(alias = "linkId")]
    pub link_id: i64,
}
