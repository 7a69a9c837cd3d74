use once_cell::sync::Lazy;
use regex::Regex;

pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/jpg", "application/pdf"];

pub const DEFAULT_FOLDER: &str = "documents";

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").unwrap());
static FOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadKeyError {
    #[error("file name is required")]
    MissingFileName,
    #[error("unsupported file type: {0} (JPEG, PNG or PDF only)")]
    UnsupportedType(String),
    #[error("invalid folder: {0}")]
    InvalidFolder(String),
}

pub fn is_allowed_content_type(ct: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&ct)
}

/// `{folder}/{millis}-{stem}.{ext}` with every stem character outside
/// `[A-Za-z0-9_-]` replaced by `_`. A name without an extension keeps none.
pub fn build_object_key(
    folder: &str,
    file_name: &str,
    content_type: Option<&str>,
    now_millis: i64,
) -> Result<String, UploadKeyError> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(UploadKeyError::MissingFileName);
    }
    if let Some(ct) = content_type.filter(|ct| !ct.is_empty()) {
        if !is_allowed_content_type(ct) {
            return Err(UploadKeyError::UnsupportedType(ct.to_string()));
        }
    }
    if !FOLDER.is_match(folder) {
        return Err(UploadKeyError::InvalidFolder(folder.to_string()));
    }

    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };
    let stem = UNSAFE_CHARS.replace_all(stem, "_");
    let key = match ext {
        Some(ext) => {
            let ext = UNSAFE_CHARS.replace_all(ext, "_");
            format!("{folder}/{now_millis}-{stem}.{ext}")
        }
        None => format!("{folder}/{now_millis}-{stem}"),
    };
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_timestamped_key() {
        let key = build_object_key("documents", "運転免許証 front.JPG", Some("image/jpeg"), 1700)
            .unwrap();
        assert_eq!(key, "documents/1700-______front.JPG");
    }

    #[test]
    fn keeps_dashes_and_underscores() {
        let key = build_object_key("id-cards", "my_scan-01.pdf", None, 5).unwrap();
        assert_eq!(key, "id-cards/5-my_scan-01.pdf");
    }

    #[test]
    fn strips_directories_from_the_name() {
        let key = build_object_key("documents", "../../etc/passwd", None, 1).unwrap();
        assert_eq!(key, "documents/1-passwd");
    }

    #[test]
    fn rejects_types_outside_allow_list() {
        assert_eq!(
            build_object_key("documents", "x.gif", Some("image/gif"), 1),
            Err(UploadKeyError::UnsupportedType("image/gif".into()))
        );
    }

    #[test]
    fn rejects_path_like_folders() {
        assert!(matches!(
            build_object_key("../secrets", "x.pdf", None, 1),
            Err(UploadKeyError::InvalidFolder(_))
        ));
    }

    #[test]
    fn requires_a_name() {
        assert_eq!(
            build_object_key("documents", "  ", None, 1),
            Err(UploadKeyError::MissingFileName)
        );
    }
}
