//! Output path normalization.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File extension every output carries
pub const NPY_SUFFIX: &str = ".npy";

/// Append `.npy` to the final path segment unless it already ends with it.
///
/// The check is a plain, case-sensitive suffix match on the file name, so
/// `frames` becomes `frames.npy`, `frames.npy` is left alone and
/// `frames.raw` becomes `frames.raw.npy`.
pub fn npy_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let has_suffix = path
        .file_name()
        .map(|name| name.to_string_lossy().ends_with(NPY_SUFFIX))
        .unwrap_or(false);

    if has_suffix {
        return path.to_path_buf();
    }

    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(NPY_SUFFIX);
    path.with_file_name(name)
}
