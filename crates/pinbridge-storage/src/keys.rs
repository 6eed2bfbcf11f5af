//! Staged file naming.
//!
//! Name format: `{unix_millis}-{8 hex chars}-{sanitized original name}`.

use chrono::Utc;
use uuid::Uuid;

const MAX_FILENAME_LENGTH: usize = 255;

/// Reduce a client supplied file name to something safe to use inside the
/// staging directory.
///
/// Directory components are dropped, `..` sequences are neutralised and any
/// character outside `[A-Za-z0-9._-]` becomes `_`. Names that end up shorter
/// than three characters fall back to `file`.
pub fn sanitize_filename(filename: &str) -> String {
    // Clients on Windows send backslash separated paths
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .replace("..", "_")
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() || sanitized.len() < 3 {
        return "file".to_string();
    }

    sanitized
}

/// Generate a fresh staged name for an upload.
pub(crate) fn generate_staged_name(original_name: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        &token[..8],
        sanitize_filename(original_name)
    )
}
