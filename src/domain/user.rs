//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::access_level::AccessLevel;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub access_level: AccessLevel,
    /// Photo bytes are loaded on demand; only their presence is tracked here.
    pub has_photo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Relative URL of the user's photo, if one is stored.
    pub fn photo_url(&self) -> Option<String> {
        self.has_photo.then(|| format!("/users/photo/{}", self.id))
    }
}

/// Data needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub access_level: AccessLevel,
}

/// Partial user update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub access_level: Option<AccessLevel>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.access_level.is_none()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = 1)]
    pub id: i64,
    /// User display name
    #[schema(example = "Alice Liddell")]
    pub name: String,
    /// Login name
    #[schema(example = "alice")]
    pub username: String,
    /// User email address
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Access level: 1 basic, 2 manager, 3 admin
    #[schema(value_type = i16, example = 1)]
    pub access_level: AccessLevel,
    /// Relative URL of the user's photo
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "/users/photo/1")]
    pub photo_url: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let photo_url = user.photo_url();
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            access_level: user.access_level,
            photo_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(has_photo: bool) -> User {
        let now = Utc::now();
        User {
            id: 9,
            name: "Alice".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            access_level: AccessLevel::Manager,
            has_photo,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_response_hides_password_hash() {
        let json = serde_json::to_string(&UserResponse::from(sample(false))).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("photoUrl"));
        assert!(json.contains("\"accessLevel\":2"));
    }

    #[test]
    fn test_photo_url_only_when_present() {
        assert_eq!(sample(true).photo_url().as_deref(), Some("/users/photo/9"));
        assert_eq!(sample(false).photo_url(), None);
    }
}
