use std::path::Path;

use chrono::Utc;
use slug::slugify;
use uuid::Uuid;

/// Builds a storage-safe, collision-resistant object name for an upload:
/// `{unix_millis}-{uuid}-{slugged stem}.{ext}`.
///
/// The extension is taken from the original name when it is short and
/// alphanumeric, otherwise derived from the MIME type.
pub fn sanitize_filename(original: Option<&str>, content_type: &str) -> String {
    let path = original.map(Path::new);

    let stem = path
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .map(|s| s.chars().take(48).collect::<String>())
        .unwrap_or_else(|| "sneaker".to_string());

    let ext = path
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| extension_for(content_type).to_string());

    format!(
        "{}-{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        stem.trim_end_matches('-'),
        ext
    )
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        "image/avif" => "avif",
        _ => "img",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_path_tricks_and_spaces() {
        let name = sanitize_filename(Some("../../My Jordans (1).JPG"), "image/jpeg");
        assert!(name.ends_with("-my-jordans-1.jpg"), "{name}");
        assert!(!name.contains('/'));
        assert!(!name.contains(' '));
    }

    #[test]
    fn falls_back_to_mime_extension() {
        let name = sanitize_filename(Some("photo"), "image/webp");
        assert!(name.ends_with("-photo.webp"), "{name}");

        let weird = sanitize_filename(Some("shot.j$g"), "image/png");
        assert!(weird.ends_with(".png"), "{weird}");
    }

    #[test]
    fn missing_names_get_a_default_stem() {
        let name = sanitize_filename(None, "image/png");
        assert!(name.ends_with("-sneaker.png"), "{name}");
    }

    #[test]
    fn names_never_collide() {
        let a = sanitize_filename(Some("kicks.png"), "image/png");
        let b = sanitize_filename(Some("kicks.png"), "image/png");
        assert_ne!(a, b);
    }
}
