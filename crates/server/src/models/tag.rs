use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::resource::ResourceId;

pub type TagId = i32;
const TAG_NAME_LENGTH_LIMIT: usize = 50;

/// An entry of the controlled tag vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagName {
    pub id: TagId,
    pub name: String,
}

/// A tag attached to a resource, as returned by the association join.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ResourceTagRow {
    pub resource_id: ResourceId,
    pub id: TagId,
    pub name: String,
}

impl From<ResourceTagRow> for TagName {
    fn from(row: ResourceTagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Tag reference supplied by clients when creating a resource. Only the id is
/// authoritative, the name is informational.
#[derive(Clone, Debug, Deserialize)]
pub struct TagRef {
    pub id: TagId,
    #[serde(default)]
    pub name: Option<String>,
}

pub fn validate_tag_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: "tag name cannot be empty".to_string(),
        });
    }
    if name.chars().count() > TAG_NAME_LENGTH_LIMIT {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: format!(
                "tag name cannot be longer than {} chars",
                TAG_NAME_LENGTH_LIMIT
            ),
        });
    }
    Ok(())
}

/// Deduplicates tag ids keeping them in ascending order.
pub fn distinct_tag_ids(tags: &[TagRef]) -> Vec<TagId> {
    let mut ids: Vec<TagId> = tags.iter().map(|tag| tag.id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
