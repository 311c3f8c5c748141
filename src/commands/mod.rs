//! # CLI Command Implementations
//!
//! One module per subcommand of the `repo-steward` command-line tool.
//!
//! Each command module contains an `Args` struct defining the
//! command-specific arguments (derived with `clap`) and an `execute`
//! function that takes the shared global flags plus the parsed `Args`
//! and performs the command's logic by calling into the `repo_steward`
//! library.

pub mod debug_repo;
pub mod debug_template;
pub mod license;
pub mod managed_files;
