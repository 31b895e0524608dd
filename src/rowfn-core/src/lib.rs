//! rowfn-core: dictionary resolution bridge for compiled row functions
//!
//! A compiled row function knows the name it was invoked under and the
//! positions of its arguments, but not which string dictionaries back them.
//! This crate connects those runtime calls to the analyzed plan and to the
//! per-query dictionary proxies:
//!
//! - [`resolver`] matches a runtime call to its analyzed call site by
//!   [`NameKey`] and returns the dictionary bound to an argument
//! - [`bridge`] decodes ids, interns transient strings and exports raw
//!   proxy handles
//! - [`executor`] holds the per-query proxies
//! - [`RowFunctionManager`] puts the pieces together for one execution unit
//!
//! Internal-consistency failures ([`InternalError`]) mean the compiled code
//! and the plan have diverged and end the query. Dictionary failures are
//! passed through as [`Error::Dictionary`].

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod bridge;
/// Error types and handling
pub mod error;
pub mod executor;
pub mod manager;
pub mod name_key;
pub mod resolver;

pub use bridge::{proxy_from_raw, DictionaryBridge, DictionaryHandle};
pub use error::{Error, InternalError, Result};
pub use executor::{ExecutionContext, Executor, RowSetMemoryOwner};
pub use manager::RowFunctionManager;
pub use name_key::{drop_suffix, NameKey};
pub use resolver::NameResolver;

pub use rowfn_shared::ids::{DictId, StringId};
