//! Centralized input limits and path helpers.

use std::path::Path;

/// Maximum number of records accepted from a single input (DOS protection)
pub const MAX_RECORDS: usize = 10_000_000;

/// Check whether adding another record would exceed `max`.
///
/// Returns `Some(message)` when the limit is reached, `None` when it is safe
/// to add one more record.
///
/// # Example
///
/// ```
/// use gfa_graph::utils::validation::{check_record_limit, MAX_RECORDS};
///
/// assert!(check_record_limit(10, MAX_RECORDS).is_none());
/// assert!(check_record_limit(3, 3).is_some());
/// ```
#[must_use]
pub fn check_record_limit(count: usize, max: usize) -> Option<String> {
    if count >= max {
        Some(format!(
            "Too many records: adding another would exceed maximum of {max}"
        ))
    } else {
        None
    }
}

/// Check if the path names a gzip-compressed file
#[must_use]
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}
