use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::resource::ResourceId;
use crate::models::user::UserId;

pub type FeedbackId = i32;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub resource_id: ResourceId,
    pub liked: Option<bool>,
    pub comment: Option<String>,
}

/// Feedback row joined with the commenter's name.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct CommentResponse {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub resource_id: ResourceId,
    pub liked: Option<bool>,
    pub comment: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: UserId,
    pub liked: Option<bool>,
    pub comment: Option<String>,
}

impl CreateFeedbackRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_comment = self
            .comment
            .as_deref()
            .is_some_and(|comment| !comment.trim().is_empty());
        if self.liked.is_none() && !has_comment {
            return Err(ValidationError::InvalidInput {
                value: "<feedback>".to_string(),
                reason: "feedback needs a like/dislike or a comment".to_string(),
            });
        }
        Ok(())
    }
}

/// Like/dislike counts of a resource. Only explicit verdicts are counted:
/// `liked = true` is a like, `liked = false` a dislike, and feedback without a
/// verdict counts toward neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackTally {
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct FeedbackTallyRow {
    pub resource_id: ResourceId,
    pub likes: i64,
    pub dislikes: i64,
}

impl From<&FeedbackTallyRow> for FeedbackTally {
    fn from(row: &FeedbackTallyRow) -> Self {
        Self {
            likes: row.likes,
            dislikes: row.dislikes,
        }
    }
}
