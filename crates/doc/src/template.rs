//! Template and clutter-rule provisioning.
//!
//! The standard infoslide template ships with the engine; a library can
//! override it, and supply its own clutter rules, from JSON files.

use songpro_core::{ClutterRules, Result, SlideTemplate};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The built-in infoslide template.
pub fn builtin_template() -> SlideTemplate {
    SlideTemplate::standard()
}

/// Load an infoslide template override from `path`.
pub fn load_template(path: &Path) -> Result<SlideTemplate> {
    let file = File::open(path)?;
    let template = serde_json::from_reader(BufReader::new(file))?;
    log::debug!("loaded template: {}", path.display());
    Ok(template)
}

/// Load songbook-specific clutter rules from `path`. Fields left out of the
/// file keep their built-in defaults.
pub fn load_clutter_rules(path: &Path) -> Result<ClutterRules> {
    let file = File::open(path)?;
    let rules = serde_json::from_reader(BufReader::new(file))?;
    log::debug!("loaded clutter rules: {}", path.display());
    Ok(rules)
}
