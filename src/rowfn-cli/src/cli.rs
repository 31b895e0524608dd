//! Command-line interface for rowfn
//!
//! Argument parsing for the `rowfn` binary, which runs dictionary
//! resolution, decoding and transient interning against JSON plan and
//! dictionary documents.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// rowfn - inspect how row functions see their string dictionaries
#[derive(Parser, Debug)]
#[command(name = "rowfn")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Which dictionary backs argument 0 of pad__text?\n  \
    rowfn resolve pad__text 0 --plan unit.json --dictionaries dicts.json\n\n  \
    # Decode string ids\n  \
    rowfn decode 4 0 1 2 --dictionaries dicts.json\n\n  \
    # Intern strings, adding transients for unknown values\n  \
    rowfn intern 4 hello world --dictionaries dicts.json")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file to use
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Dictionary document (JSON object of id -> strings)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub dictionaries: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the dictionary bound to a function argument
    Resolve {
        /// Function name as invoked (overload suffix and case are ignored)
        function: String,

        /// Zero-based argument position
        arg_index: usize,

        /// Execution unit document (JSON)
        #[arg(short, long, value_name = "FILE")]
        plan: Option<PathBuf>,

        /// Only consider call sites with this many arguments
        #[arg(short, long, value_name = "N")]
        arity: Option<usize>,

        /// List every call site sharing the function's name key
        #[arg(long)]
        candidates: bool,
    },

    /// Decode string ids of a dictionary
    Decode {
        /// Dictionary id
        #[arg(allow_negative_numbers = true)]
        dict_id: i32,

        /// String ids to decode
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i32>,
    },

    /// Look up strings, adding transient entries for unknown ones
    Intern {
        /// Dictionary id
        #[arg(allow_negative_numbers = true)]
        dict_id: i32,

        /// Strings to intern
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Create default configuration file
    Init {
        /// Path to create config file
        #[arg(default_value = "rowfn.toml")]
        path: PathBuf,

        /// Force overwrite if file exists
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
