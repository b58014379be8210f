//! Storage name derivation.
//!
//! A storage name is a pure function of the original filename plus a random
//! UUID prefix: `{uuid-simple}_{sanitized-original}`. The prefix makes names
//! collision-free even for identical filenames uploaded concurrently; the
//! sanitized suffix keeps blobs recognizable on disk.

use uuid::Uuid;

/// Maximum length kept from the sanitized original name.
const MAX_SUFFIX_LEN: usize = 120;

/// Derive a unique, path-safe storage name for an uploaded file.
pub fn storage_name_for(original_name: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize(original_name))
}

/// Reduce a client-supplied filename to a safe suffix: last path component
/// only, restricted charset, no leading dots, bounded length.
fn sanitize(original_name: &str) -> String {
    let last = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let mut cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    while cleaned.starts_with('.') {
        cleaned.remove(0);
    }
    if cleaned.len() > MAX_SUFFIX_LEN {
        cleaned.truncate(MAX_SUFFIX_LEN);
    }
    if cleaned.is_empty() {
        cleaned.push_str("file");
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_for_identical_inputs() {
        let a = storage_name_for("report.pdf");
        let b = storage_name_for("report.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("_report.pdf"));
    }

    #[test]
    fn traversal_components_are_stripped() {
        let name = storage_name_for("../../etc/passwd");
        assert!(!name.contains(".."));
        assert!(!name.contains('/'));
        assert!(name.ends_with("_passwd"));
    }

    #[test]
    fn windows_paths_and_odd_chars_are_flattened() {
        let name = storage_name_for("C:\\Users\\me\\my file?.txt");
        assert!(!name.contains('\\'));
        assert!(name.ends_with("_my_file_.txt"));
    }

    #[test]
    fn hidden_file_names_lose_leading_dots() {
        let name = storage_name_for(".env");
        assert!(name.ends_with("_env"));
    }

    #[test]
    fn empty_name_falls_back() {
        let name = storage_name_for("");
        assert!(name.ends_with("_file"));
    }
}
