//! Custom request extractors.

mod upload;
mod validated_json;

pub use upload::read_image_field;
pub use validated_json::ValidatedJson;
