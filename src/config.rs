//! # Central Template Configuration
//!
//! This module defines the data structures for the centrally maintained
//! template configuration file, as well as the logic for loading it. The
//! configuration declares every file the tool knows how to manage, optional
//! named groups of those files, and the global default variables available
//! to all templates.
//!
//! ## Key Components
//!
//! - **`GlobalConfig`**: the whole configuration: groups, managed files,
//!   and global default variables. Loaded once per run and read-only
//!   thereafter.
//!
//! - **`ManagedFile`**: one logical file the tool manages: its template
//!   source, the canonical path it lives at in target repositories, and
//!   any legacy alternate paths that are removed when the canonical file
//!   is written.
//!
//! - **`FileGroup`**: a named, ordered list of managed-file names, letting
//!   a single `group:<name>` token in a repository property expand into
//!   many files.
//!
//! ## Example
//!
//! ```yaml
//! groups:
//!   - name: security
//!     templates:
//!       - dependabot
//!       - codeql
//! files:
//!   - name: dependabot
//!     template_name: dependabot.yml
//!     repo_path: .github/dependabot.yml
//!     alternate_paths:
//!       - .dependabot/config.yml
//! variables:
//!   CGO_ENABLED: "0"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named group of managed files, expandable from a single
/// `group:<name>` token in a repository's managed-files property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileGroup {
    /// Group name, referenced as `group:<name>`.
    pub name: String,
    /// The managed-file names in this group, in the order they are
    /// checked and committed.
    pub templates: Vec<String>,
}

/// A single file managed by the tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedFile {
    /// Logical name, referenced from properties and group definitions.
    pub name: String,
    /// Name of the template file under the templates directory.
    pub template_name: String,
    /// Canonical path of the rendered file inside a target repository.
    pub repo_path: String,
    /// Legacy paths removed when the canonical file is written.
    #[serde(default)]
    pub alternate_paths: Vec<String>,
}

/// The full central configuration: groups, managed files, and global
/// default template variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Named groups of managed files.
    #[serde(default)]
    pub groups: Vec<FileGroup>,
    /// Every file the tool knows how to manage.
    #[serde(default)]
    pub files: Vec<ManagedFile>,
    /// Global default variables, overridable per repository (except for
    /// the non-overridable keys, see [`crate::template`]).
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl GlobalConfig {
    /// Load the configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&text).map_err(|e| match e {
            Error::ConfigParse { message, .. } => Error::ConfigParse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse a configuration from a YAML string.
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::ConfigParse {
            path: String::new(),
            message: e.to_string(),
        })
    }

    /// Expand a group name into the managed-file names it declares, in
    /// declared order.
    ///
    /// Returns [`Error::UnknownGroup`] for a name no group carries; the
    /// reconciliation driver downgrades that to a logged warning.
    pub fn expand_group(&self, name: &str) -> Result<&[String]> {
        self.groups
            .iter()
            .find(|group| group.name == name)
            .map(|group| group.templates.as_slice())
            .ok_or_else(|| Error::UnknownGroup {
                name: name.to_string(),
            })
    }

    /// Look up the settings for a single managed file by name.
    pub fn file_info(&self, name: &str) -> Option<&ManagedFile> {
        self.files.iter().find(|file| file.name == name)
    }
}
