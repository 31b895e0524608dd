//! String dictionaries for rowfn
//!
//! A [`StringDictionary`] holds the persistent id <-> string mapping of a
//! dictionary-encoded text column. A [`StringDictionaryProxy`] layers a
//! per-query table of transient strings on top of it, and a
//! [`DictionaryCatalog`] names the dictionaries visible to a query.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod catalog;
pub mod dictionary;
pub mod proxy;

pub use catalog::DictionaryCatalog;
pub use dictionary::StringDictionary;
pub use proxy::StringDictionaryProxy;

use rowfn_shared::ids::{DictId, StringId};

/// Result type for dictionary operations
pub type Result<T> = std::result::Result<T, Error>;

/// Dictionary error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown string dictionary: {0}")]
    UnknownDictionary(DictId),
    #[error("String id {string_id} not found in dictionary {dict_id}")]
    UnknownStringId { dict_id: DictId, string_id: StringId },
    #[error("String id {string_id} is not a valid id for dictionary {dict_id}")]
    InvalidStringId { dict_id: DictId, string_id: StringId },
    #[error("Dictionary {0} has no ids left")]
    IdSpaceExhausted(DictId),
    #[error("Invalid dictionary document: {0}")]
    InvalidDocument(String),
}
