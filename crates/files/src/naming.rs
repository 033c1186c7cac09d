//! Splitting an uploaded file's original name into the stored base name and extension.
//!
//! The two halves are derived independently:
//!
//! - the **extension** runs from the last `.` of the final path component to the end, dot
//!   included (`"report.v2.pdf"` → `".pdf"`)
//! - the **base name** is everything before the *first* `.` of the whole name
//!   (`"report.v2.pdf"` → `"report"`)
//!
//! A name whose last component starts with its only dots (`".bashrc"`, `"..."`) has no
//! extension.

/// Returns `(file_name, file_extension)` for an uploaded file's original name.
pub fn split_original_name(original: &str) -> (String, String) {
    (
        file_name(original).to_owned(),
        file_extension(original).to_owned(),
    )
}

/// Extension of `original`, including the leading dot, or `""` when there is none.
pub fn file_extension(original: &str) -> &str {
    let base = original.rsplit('/').next().unwrap_or(original);

    match base.rfind('.') {
        Some(dot) if !base[..dot].bytes().all(|b| b == b'.') => &base[dot..],
        _ => "",
    }
}

/// Base name of `original`: the substring before its first `.`.
pub fn file_name(original: &str) -> &str {
    original.split('.').next().unwrap_or(original)
}
