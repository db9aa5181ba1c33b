//! Image content-type helpers

use mime::Mime;

/// Image subtypes the gateway accepts for background removal
const ALLOWED_IMAGE_SUBTYPES: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Resolve a content type from the filename extension, defaulting to PNG
pub fn resolve_content_type(filename: &str) -> Mime {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".png") {
        mime::IMAGE_PNG
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        mime::IMAGE_JPEG
    } else if lower.ends_with(".gif") {
        mime::IMAGE_GIF
    } else {
        mime::IMAGE_PNG
    }
}

/// Check a content-type header against the image allow-list.
///
/// Parameters such as `; charset=...` are ignored.
pub fn is_allowed_image_type(content_type: &str) -> bool {
    let Ok(parsed) = content_type.trim().parse::<Mime>() else {
        return false;
    };

    parsed.type_().as_str().eq_ignore_ascii_case("image")
        && ALLOWED_IMAGE_SUBTYPES
            .iter()
            .any(|subtype| parsed.subtype().as_str().eq_ignore_ascii_case(subtype))
}
