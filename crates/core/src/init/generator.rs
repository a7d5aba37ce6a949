//! Directory structure and file generation for `.fx-advisor` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files written in minimal mode.
const MINIMAL_TEMPLATES: [&str; 2] = ["config.toml", "agents/advisor.md"];

/// Options for initializing a `.fx-advisor` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where `.fx-advisor` will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.fx-advisor` directory.
    pub force: bool,

    /// Only write `config.toml` and the advisor role.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.fx-advisor` directory structure from the embedded templates.
///
/// ```text
/// .fx-advisor/
/// ├── config.toml
/// ├── banks.yaml (unless minimal)
/// └── agents/
///     ├── advisor.md
///     └── brief-advisor.md (unless minimal)
/// ```
///
/// Returns the written paths, relative to `.fx-advisor/`.
///
/// # Errors
/// - The directory already exists and `force` is not set
/// - A template file cannot be found
/// - File system operations fail
pub async fn generate_config_structure(options: InitOptions) -> InitResult<Vec<String>> {
    let fx_dir = options.target_dir.join(CONFIG_DIR);

    if fx_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(fx_dir));
    }

    fs::create_dir_all(fx_dir.join("agents")).map_err(|source| InitError::DirectoryCreate {
        path: fx_dir.join("agents"),
        source,
    })?;

    let templates: Vec<String> = if options.minimal {
        MINIMAL_TEMPLATES.iter().map(|p| p.to_string()).collect()
    } else {
        list_templates("")
    };

    for template_path in &templates {
        write_template_file(&fx_dir, template_path)?;
    }

    debug!(dir = %fx_dir.display(), files = templates.len(), "config structure written");
    Ok(templates)
}

/// Write one template to `fx_dir`, creating parent directories as needed.
fn write_template_file(fx_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = fx_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })?;

    Ok(())
}
