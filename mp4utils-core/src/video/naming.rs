//! Filename helpers used when deriving input and output names.

use std::path::Path;

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Extension given to names that have none, and to every output.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Length of the random disambiguator inserted into output names.
pub const RANDOM_SUFFIX_LEN: usize = 8;

fn extension_of(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

/// Appends `.mp4` when `name` has no extension; otherwise returns it unchanged.
#[must_use]
pub fn auto_append_extension(name: &str) -> String {
    match extension_of(name) {
        Some(_) => name.to_string(),
        None => format!("{name}.{OUTPUT_EXTENSION}"),
    }
}

/// Inserts `_` plus an 8-character alphanumeric suffix before the extension.
#[must_use]
pub fn append_random_suffix(name: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();
    insert_suffix(name, &suffix)
}

fn insert_suffix(name: &str, suffix: &str) -> String {
    match extension_of(name) {
        Some(ext) => {
            let stem = &name[..name.len() - ext.len() - 1];
            format!("{stem}_{suffix}.{ext}")
        }
        None => format!("{name}_{suffix}"),
    }
}

/// Replaces (or adds) the extension so the name ends in `.mp4`.
#[must_use]
pub fn force_mp4_extension(name: &str) -> String {
    match extension_of(name) {
        Some(ext) if ext == OUTPUT_EXTENSION => name.to_string(),
        Some(ext) => format!("{}.{OUTPUT_EXTENSION}", &name[..name.len() - ext.len() - 1]),
        None => format!("{name}.{OUTPUT_EXTENSION}"),
    }
}
