use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::Image;

/// Created response helper (common pattern for POST endpoints)
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// No content response helper (common pattern for DELETE endpoints)
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Raw image bytes with a sniffed `Content-Type`
pub struct ImageBody(pub Image);

impl IntoResponse for ImageBody {
    fn into_response(self) -> Response {
        let content_type = self.0.content_type();
        ([(header::CONTENT_TYPE, content_type)], self.0.bytes).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_and_no_content_status() {
        assert_eq!(Created("x").into_response().status(), StatusCode::CREATED);
        assert_eq!(NoContent.into_response().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_image_body_sets_content_type() {
        let response = ImageBody(Image::new(vec![0xFF, 0xD8, 0xFF, 0xE0])).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    }
}
