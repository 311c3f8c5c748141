//! # File Materialization
//!
//! Turns a managed file's template into concrete bytes inside a
//! repository working copy: render with the resolved variable context,
//! then write to the canonical path, creating parent directories as
//! needed.
//!
//! Before the canonical path is written, every registered alternate
//! (legacy) path is removed. Deleting first matters: when a legacy
//! filename is textually close to the canonical one, the version-control
//! diff can present the change as a rename with modifications instead of
//! an unrelated delete plus add.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::config::ManagedFile;
use crate::error::Result;
use crate::template;

/// Materialize one managed file into `work_dir`.
///
/// Returns the alternate paths that actually existed and were removed,
/// so the caller can stage their deletion. Removal of a non-existent
/// alternate is not an error; the failure is intentionally swallowed.
pub fn materialize(
    work_dir: &Path,
    file: &ManagedFile,
    templates_dir: &Path,
    context: &HashMap<String, String>,
) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for alternate in &file.alternate_paths {
        if fs::remove_file(work_dir.join(alternate)).is_ok() {
            debug!("removed alternate path {alternate}");
            removed.push(alternate.clone());
        }
    }

    let template_text = fs::read_to_string(templates_dir.join(&file.template_name))?;
    let content = template::render(&template_text, context)?;

    let target = work_dir.join(&file.repo_path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, content)?;

    Ok(removed)
}
