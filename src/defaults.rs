//! Default values for repo-steward configuration.
//!
//! Centralized so commands stay consistent about where working copies
//! land when no flag is given.

use std::path::PathBuf;

/// Returns the default root directory for repository clones.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/repo-steward/clones` (XDG Base Directory)
/// - macOS: `~/Library/Caches/repo-steward/clones`
/// - Windows: `{FOLDERID_LocalAppData}\repo-steward\clones`
///
/// Falls back to `.repo-steward-clones` in the current directory if the
/// platform cache directory cannot be determined.
///
/// This can be overridden by the `--clones-root` CLI flag or the
/// `REPO_STEWARD_CLONES` environment variable.
pub fn default_clones_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".repo-steward-clones"))
        .join("repo-steward")
        .join("clones")
}
