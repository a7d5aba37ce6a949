//! Initialization module for creating `.fx-advisor` directory structures.
//!
//! Generates a `.fx-advisor/` directory with editable templates for:
//! - Global configuration (`config.toml`)
//! - The demo bank table (`banks.yaml`)
//! - Role prompts (`agents/*.md`)
//!
//! # Example
//!
//! ```no_run
//! use fx_core::init::{generate_config_structure, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! let written = generate_config_structure(options).await?;
//! println!("Wrote {} files", written.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_config_structure, InitOptions};
pub use templates::{get_template, list_templates};
