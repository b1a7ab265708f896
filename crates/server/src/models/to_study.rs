use serde::{Deserialize, Serialize};

use crate::models::resource::ResourceId;
use crate::models::user::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ToStudyEntry {
    pub user_id: UserId,
    pub resource_id: ResourceId,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AddToStudyRequest {
    #[serde(rename = "resourceId", alias = "resource_id")]
    pub resource_id: ResourceId,
}
