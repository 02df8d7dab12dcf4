//! Stored-name generation.
//!
//! Stored names are `{uuid}_{unix-ts}.{ext}` with the extension lowercased.
//! The client-supplied filename never reaches the filesystem; only its
//! extension survives, and that extension has already passed the allowlist
//! check by the time a name is generated.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generate a unique stored name for an accepted upload.
pub fn generate_stored_name(original_name: &str) -> String {
    let ext = extension_of(original_name);
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    if ext.is_empty() {
        format!("{}_{}", Uuid::new_v4(), ts)
    } else {
        format!("{}_{}.{}", Uuid::new_v4(), ts, ext)
    }
}

/// Lowercased extension of a filename, or the empty string.
pub fn extension_of(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_lowercased_extension() {
        let name = generate_stored_name("Resume.PDF");
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn names_do_not_collide() {
        let a = generate_stored_name("cv.pdf");
        let b = generate_stored_name("cv.pdf");
        assert_ne!(a, b);
    }

    #[test]
    fn extension_extraction_handles_edge_cases() {
        assert_eq!(extension_of("cv.pdf"), "pdf");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn generated_name_contains_no_client_input() {
        let name = generate_stored_name("../../etc/passwd.pdf");
        assert!(!name.contains(".."));
        assert!(!name.contains('/'));
    }
}
