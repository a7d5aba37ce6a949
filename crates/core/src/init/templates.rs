//! Embedded template files for `.fx-advisor` initialization.
//!
//! The workspace `templates/` directory is embedded into the binary at
//! compile time, so `fx-advisor init` works without any files on disk.
//! With the `debug-embed` feature the files are embedded in debug builds
//! too, which keeps tests independent of the working directory.

use rust_embed::RustEmbed;

/// Embedded template files from the workspace `templates/` directory
/// (`crates/core/../../templates`).
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path, e.g. `"agents/advisor.md"`.
///
/// # Example
/// ```
/// use fx_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("[search]"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files whose path starts with `prefix`, sorted.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}
