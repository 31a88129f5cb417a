//! Update detection.
//!
//! Installed and latest artifacts are compared by file name only. Upstreams
//! disagree on versioning schemes (tags, CI build numbers, feed versions, or
//! none at all) but every one of them exposes a file name, so that is the only
//! key compared here. There is no semantic version parsing, timestamp check or
//! content hashing.
//!
//! A consequence is that an upstream serving the same file name for every
//! build is never detected as changed. The installer special-cases the two
//! static-filename projects instead of strengthening this comparison.

/// Whether `latest` should replace `installed`.
///
/// The comparison is a case-insensitive inequality of the two file names.
/// Nothing installed always counts as an update.
#[must_use]
pub fn is_update_available(installed: Option<&str>, latest: &str) -> bool {
    match installed {
        Some(installed) => !same_file_name(installed, latest),
        None => true,
    }
}

/// Case-insensitive file name equality.
#[must_use]
pub fn same_file_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
