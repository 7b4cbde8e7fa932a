use std::path::{Path, PathBuf};

use crate::system::platform::Architecture;

/// Paths, relative to an expanded release archive, where a prebuilt binary
/// may live. Older Sui releases ship `target/release/sui-ubuntu-<arch>`,
/// newer ones put a plain `sui` at the archive root.
pub fn executable_candidates(tool: &str, arch: Architecture) -> Vec<PathBuf> {
    vec![
        Path::new("target")
            .join("release")
            .join(arch.release_binary_name(tool)),
        Path::new("target").join("release").join(tool),
        Path::new("bin").join(tool),
        PathBuf::from(tool),
    ]
}

/// Get the actual path to a tool's executable within an expanded archive
pub fn find_executable(root: &Path, tool: &str, arch: Architecture) -> Option<PathBuf> {
    executable_candidates(tool, arch)
        .into_iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.is_file())
}
