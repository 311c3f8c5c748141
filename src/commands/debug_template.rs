//! # Debug-Template Command
//!
//! Renders a single template to stdout using the global default
//! variables (no per-repository overrides), so template changes can be
//! eyeballed without touching any repository.

use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result};
use clap::Args;

use repo_steward::template;

use crate::cli::GlobalArgs;

/// Render a template for debugging
#[derive(Args, Debug)]
pub struct DebugTemplateArgs {
    /// Name of the template file under the templates directory
    #[arg(value_name = "TEMPLATE")]
    pub name: String,
}

/// Execute the `debug-template` command.
pub fn execute(global: &GlobalArgs, args: DebugTemplateArgs) -> Result<()> {
    let cfg = global.load_config()?;

    let path = global.templates.join(&args.name);
    let template_text = fs::read_to_string(&path)
        .with_context(|| format!("reading template {}", path.display()))?;

    let context = template::resolve_context(&cfg.variables, &HashMap::new());
    let rendered = template::render(&template_text, &context)?;

    println!("{rendered}");
    Ok(())
}
