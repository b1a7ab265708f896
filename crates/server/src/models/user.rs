use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub type UserId = i32;
const USER_NAME_LENGTH_LIMIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub is_faculty: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub is_faculty: bool,
}

pub fn validate_user_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: "user name cannot be empty".to_string(),
        });
    }
    if name.chars().count() > USER_NAME_LENGTH_LIMIT {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: format!(
                "user name cannot be longer than {} chars",
                USER_NAME_LENGTH_LIMIT
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        assert!(validate_user_name("   ").is_err());
        assert!(validate_user_name("Ada").is_ok());
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "a".repeat(USER_NAME_LENGTH_LIMIT + 1);
        assert!(matches!(
            validate_user_name(&name),
            Err(ValidationError::InvalidInput { .. })
        ));
    }
}
