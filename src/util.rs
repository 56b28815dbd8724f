// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

/// Extension that marks a memory image as raw binary rather than hex text.
pub const BINARY_IMAGE_EXTENSION: &str = ".bin";

/// ceil(log2(value)). Non-powers of two round up; `0` and `1` yield `0`.
pub fn clog2(value: u64) -> u32 {
    if value <= 1 {
        0
    } else {
        u64::BITS - (value - 1).leading_zeros()
    }
}

/// Binary format is decided from the file name alone.
pub fn is_binary_image(path: &Path) -> bool {
    path.to_string_lossy().ends_with(BINARY_IMAGE_EXTENSION)
}

/// Expands a leading `~/` using `$HOME`.
pub fn expand_user(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}
