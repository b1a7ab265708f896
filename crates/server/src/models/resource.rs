use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::feedback::FeedbackTally;
use crate::models::tag::{TagName, TagRef};
use crate::models::user::UserId;

pub type ResourceId = i32;
const RESOURCE_NAME_LENGTH_LIMIT: usize = 255;
const AUTHOR_NAME_LENGTH_LIMIT: usize = 255;
const URL_LENGTH_LIMIT: usize = 2048;
const CONTENT_TYPE_LENGTH_LIMIT: usize = 50;
const REC_STATUS_LENGTH_LIMIT: usize = 255;

fn validate_length(field: &str, value: &str, limit: usize) -> Result<(), ValidationError> {
    if value.chars().count() > limit {
        return Err(ValidationError::InvalidInput {
            value: value.to_string(),
            reason: format!("{field} cannot be longer than {limit} chars"),
        });
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Resource {
    pub id: ResourceId,
    pub resource_name: String,
    pub author_name: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub content_type: Option<String>,
    pub week_no: Option<i32>,
    pub recommender_id: Option<UserId>,
    pub rec_status: Option<String>,
    pub rec_message: Option<String>,
    pub creation_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateResourceRequest {
    pub resource_name: String,
    pub author_name: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub content_type: Option<String>,
    pub week_no: Option<i32>,
    pub recommender_id: Option<UserId>,
    pub rec_status: Option<String>,
    pub rec_message: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
}

impl CreateResourceRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resource_name.trim().is_empty() {
            return Err(ValidationError::InvalidInput {
                value: self.resource_name.clone(),
                reason: "resource name cannot be empty".to_string(),
            });
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::InvalidInput {
                value: self.url.clone(),
                reason: "resource url cannot be empty".to_string(),
            });
        }
        validate_length("resource name", &self.resource_name, RESOURCE_NAME_LENGTH_LIMIT)?;
        validate_length("resource url", &self.url, URL_LENGTH_LIMIT)?;
        if let Some(author_name) = &self.author_name {
            validate_length("author name", author_name, AUTHOR_NAME_LENGTH_LIMIT)?;
        }
        if let Some(content_type) = &self.content_type {
            validate_length("content type", content_type, CONTENT_TYPE_LENGTH_LIMIT)?;
        }
        if let Some(rec_status) = &self.rec_status {
            validate_length("recommendation status", rec_status, REC_STATUS_LENGTH_LIMIT)?;
        }
        if let Some(week_no) = self.week_no {
            if week_no < 1 {
                return Err(ValidationError::InvalidInput {
                    value: week_no.to_string(),
                    reason: "week number should be >= 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Resource row joined with the recommending user, if any.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ResourceWithRecommenderRow {
    #[sqlx(flatten)]
    pub resource: Resource,
    pub recommender_name: Option<String>,
    pub recommender_is_faculty: Option<bool>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResourceWithTags {
    #[serde(flatten)]
    pub resource: Resource,
    pub tags: Vec<TagName>,
}

/// Element of the resource listing.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceSummary {
    #[serde(flatten)]
    pub resource: Resource,
    pub tags: Vec<TagName>,
    #[serde(flatten)]
    pub tally: FeedbackTally,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResourceDetail {
    #[serde(flatten)]
    pub resource: Resource,
    pub recommender_name: Option<String>,
    pub recommender_is_faculty: Option<bool>,
    pub tags: Vec<TagName>,
    #[serde(flatten)]
    pub tally: FeedbackTally,
}
