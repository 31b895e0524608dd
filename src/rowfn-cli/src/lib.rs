//! rowfn-cli library
//!
//! Provides the configuration loader and subcommand implementations used by
//! the `rowfn` binary.

pub mod cli;
pub mod commands;
pub mod config;

pub use config::Config;

/// Build information captured by the build script
pub const BUILD_INFO: rowfn_shared::BuildInfo = rowfn_shared::BuildInfo {
    version: rowfn_shared::VERSION,
    git_hash: option_env!("GIT_HASH"),
    build_date: option_env!("BUILD_DATE"),
    rust_version: option_env!("RUSTC_VERSION"),
};
