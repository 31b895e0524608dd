//! Canonical function names
//!
//! Overloads of one logical function are registered under mangled names such
//! as `pad__text` or `pad__2`. Runtime calls and analyzed call sites are
//! matched on their [`NameKey`]: the part before the first `__`, lowercased.

use std::fmt;

use rowfn_shared::constants::NAME_SUFFIX_DELIMITER;

use crate::error::InternalError;

/// Suffix-stripped, lowercased function name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(String);

/// Remove the overload suffix (everything from the first `__`)
pub fn drop_suffix(name: &str) -> Result<&str, InternalError> {
    match name.find(NAME_SUFFIX_DELIMITER) {
        None => Ok(name),
        Some(0) => Err(InternalError::EmptyFunctionName {
            name: name.to_string(),
        }),
        Some(idx) => Ok(&name[..idx]),
    }
}

impl NameKey {
    /// Canonicalize `name`
    pub fn new(name: &str) -> Result<Self, InternalError> {
        drop_suffix(name).map(|base| NameKey(base.to_lowercase()))
    }

    /// The canonical name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
