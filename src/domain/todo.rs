//! Todo items and their per-user statuses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::MAX_IMAGE_BYTES;
use crate::errors::{AppError, AppResult};

/// Todo domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status_id: i64,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Relative URL of the todo's image, if one is stored.
    pub fn image_url(&self) -> Option<String> {
        self.has_image.then(|| format!("/todos/image/{}", self.id))
    }
}

/// Todo status owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoStatus {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "doing")]
    pub name: String,
    #[schema(example = 1)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoStatus {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Fields written when creating or replacing a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: String,
    pub status_id: i64,
}

/// Todo response (image bytes replaced by a URL)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "Two litres, semi-skimmed")]
    pub description: String,
    #[schema(example = 1)]
    pub status_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "/todos/image/1")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        let image_url = todo.image_url();
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            status_id: todo.status_id,
            image_url,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

/// Stored image bytes (todo image or user photo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub bytes: Vec<u8>,
}

impl Image {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Accept an upload of 1 byte up to [`MAX_IMAGE_BYTES`].
    pub fn from_upload(bytes: Vec<u8>) -> AppResult<Self> {
        if bytes.is_empty() {
            return Err(AppError::validation("Image is empty"));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::validation("Image is larger than 5MB"));
        }
        Ok(Self { bytes })
    }

    /// Content type sniffed from the leading magic bytes.
    pub fn content_type(&self) -> &'static str {
        const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

        if self.bytes.starts_with(PNG) {
            "image/png"
        } else if self.bytes.starts_with(JPEG) {
            "image/jpeg"
        } else {
            "application/octet-stream"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_follows_presence() {
        let now = Utc::now();
        let mut todo = Todo {
            id: 4,
            title: "t".into(),
            description: "d".into(),
            status_id: 1,
            has_image: false,
            created_at: now,
            updated_at: now,
        };
        assert!(TodoResponse::from(todo.clone()).image_url.is_none());

        todo.has_image = true;
        let response = TodoResponse::from(todo);
        assert_eq!(response.image_url.as_deref(), Some("/todos/image/4"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["imageUrl"], "/todos/image/4");
        assert_eq!(json["statusId"], 1);
    }

    #[test]
    fn test_content_type_sniffing() {
        let png = Image::new(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]);
        let jpeg = Image::new(vec![0xFF, 0xD8, 0xFF, 0xE0]);
        let other = Image::new(b"GIF89a".to_vec());

        assert_eq!(png.content_type(), "image/png");
        assert_eq!(jpeg.content_type(), "image/jpeg");
        assert_eq!(other.content_type(), "application/octet-stream");
    }

    #[test]
    fn test_upload_size_limits() {
        assert!(Image::from_upload(Vec::new()).is_err());
        assert!(Image::from_upload(vec![0; MAX_IMAGE_BYTES]).is_ok());
        assert!(Image::from_upload(vec![0; MAX_IMAGE_BYTES + 1]).is_err());
    }
}
