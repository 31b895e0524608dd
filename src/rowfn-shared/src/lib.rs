//! rowfn-shared: Shared types and utilities for rowfn crates
//!
//! This crate contains the id types, sentinel values and small helpers used
//! by the plan, dictionary and bridge crates, so that they agree on how
//! dictionary ids and string ids are represented.
//!
//! # Features
//!
//! - **Common Result Type**: Standardized Result type alias
//! - **Error Utilities**: Helpers for building glue-level errors
//! - **Id Types**: Dictionary and string id aliases plus sentinel values
//! - **Version Information**: Build and version metadata

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

/// Result type alias for rowfn glue code
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information structure
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Package version
    pub version: &'static str,
    /// Git commit hash (if available)
    pub git_hash: Option<&'static str>,
    /// Build timestamp (if available)
    pub build_date: Option<&'static str>,
    /// Rust compiler version (if available)
    pub rust_version: Option<&'static str>,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rowfn {}", self.version)?;

        if let Some(hash) = self.git_hash {
            writeln!(f, "Git hash: {hash}")?;
        }

        if let Some(date) = self.build_date {
            writeln!(f, "Built: {date}")?;
        }

        if let Some(rust_ver) = self.rust_version {
            writeln!(f, "Rust: {rust_ver}")?;
        }

        Ok(())
    }
}

/// Common error handling utilities
pub mod error {
    /// Create a configuration error
    pub fn config_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Configuration error: {}", msg.into())
    }

    /// Create an input error for plan or dictionary documents
    pub fn input_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Input error: {}", msg.into())
    }
}

/// Dictionary and string id representation
pub mod ids {
    /// Key naming a string dictionary within one query's scope
    pub type DictId = i32;

    /// Id of a string inside a dictionary (persistent when >= 0, transient when < -1)
    pub type StringId = i32;

    /// Null / invalid string id
    pub const INVALID_STR_ID: StringId = i32::MIN;

    /// First id handed out to a transient string; later ones count down from here
    pub const TRANSIENT_ID_START: StringId = -2;

    /// Whether `id` lies in the transient id space
    pub fn is_transient(id: StringId) -> bool {
        id <= TRANSIENT_ID_START && id != INVALID_STR_ID
    }

    /// Transient id for the `index`-th transient string of a proxy
    pub fn transient_id_for_index(index: usize) -> Option<StringId> {
        let offset = i32::try_from(index).ok()?;
        let id = TRANSIENT_ID_START.checked_sub(offset)?;
        (id != INVALID_STR_ID).then_some(id)
    }

    /// Position of a transient id within its proxy's transient table
    pub fn transient_index(id: StringId) -> Option<usize> {
        if !is_transient(id) {
            return None;
        }
        usize::try_from(TRANSIENT_ID_START - id).ok()
    }
}

/// Common constants
pub mod constants {
    /// Separates a function's base name from its overload suffix
    pub const NAME_SUFFIX_DELIMITER: &str = "__";

    /// Config file names searched in order
    pub const CONFIG_FILE_NAMES: [&str; 4] =
        ["rowfn.toml", ".rowfn.toml", "rowfn.yaml", ".rowfn.yaml"];
}
