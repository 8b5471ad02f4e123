//! Multipart image upload reading.

use axum::extract::Multipart;

use crate::config::MAX_IMAGE_BYTES;
use crate::errors::{AppError, AppResult};

/// Read the bytes of the multipart field `name`, capped at [`MAX_IMAGE_BYTES`].
///
/// Other fields are skipped. A missing field is a validation error.
pub async fn read_image_field(mut multipart: Multipart, name: &str) -> AppResult<Vec<u8>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(name) {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(AppError::validation("Image is larger than 5MB"));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }

    Err(AppError::validation(format!("Missing multipart field '{}'", name)))
}
