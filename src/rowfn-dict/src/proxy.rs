//! Per-query view of a string dictionary
//!
//! The proxy answers lookups from the shared persistent dictionary and keeps
//! strings the query invents (transients) in its own table. Transient ids are
//! negative, starting at `-2` and counting down; they are never written back
//! to the dictionary and disappear with the proxy.

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;
use parking_lot::RwLock;
use rowfn_shared::ids::{self, DictId, StringId};

use crate::dictionary::StringDictionary;
use crate::{Error, Result};

/// Query-scoped proxy over a shared [`StringDictionary`]
#[derive(Debug)]
pub struct StringDictionaryProxy {
    dictionary: Arc<StringDictionary>,
    transients: RwLock<TransientTable>,
}

#[derive(Debug, Default)]
struct TransientTable {
    strings: Vec<String>,
    ids: HashMap<String, StringId>,
}

impl StringDictionaryProxy {
    /// Create a proxy with an empty transient table
    pub fn new(dictionary: Arc<StringDictionary>) -> Self {
        Self {
            dictionary,
            transients: RwLock::new(TransientTable::default()),
        }
    }

    /// Id of the proxied dictionary
    pub fn dict_id(&self) -> DictId {
        self.dictionary.dict_id()
    }

    /// The persistent dictionary behind this proxy
    pub fn dictionary(&self) -> &StringDictionary {
        &self.dictionary
    }

    /// String bound to `string_id`, persistent or transient
    pub fn get_string(&self, string_id: StringId) -> Result<String> {
        let dict_id = self.dict_id();
        if string_id >= 0 {
            return self
                .dictionary
                .get_string(string_id)
                .map(str::to_owned)
                .ok_or(Error::UnknownStringId { dict_id, string_id });
        }

        let idx = ids::transient_index(string_id)
            .ok_or(Error::InvalidStringId { dict_id, string_id })?;
        self.transients
            .read()
            .strings
            .get(idx)
            .cloned()
            .ok_or(Error::UnknownStringId { dict_id, string_id })
    }

    /// Strings bound to each id in `string_ids`, in order
    pub fn get_strings(&self, string_ids: &[StringId]) -> Result<Vec<String>> {
        string_ids.iter().map(|&id| self.get_string(id)).collect()
    }

    /// Id of `value` without adding it
    pub fn get_id_of_string(&self, value: &str) -> Option<StringId> {
        self.dictionary
            .get_id(value)
            .or_else(|| self.transients.read().ids.get(value).copied())
    }

    /// Id of `value`: the persistent id if the dictionary has it, else a
    /// transient id, assigned on first use
    pub fn get_or_add_transient(&self, value: &str) -> Result<StringId> {
        if let Some(id) = self.dictionary.get_id(value) {
            return Ok(id);
        }
        if let Some(&id) = self.transients.read().ids.get(value) {
            return Ok(id);
        }

        let mut table = self.transients.write();
        // Another writer may have added it between the locks
        if let Some(&id) = table.ids.get(value) {
            return Ok(id);
        }
        let id = ids::transient_id_for_index(table.strings.len())
            .ok_or(Error::IdSpaceExhausted(self.dict_id()))?;
        table.strings.push(value.to_owned());
        table.ids.insert(value.to_owned(), id);
        trace!(
            "dictionary {}: transient id {} for {:?}",
            self.dict_id(),
            id,
            value
        );
        Ok(id)
    }

    /// [`get_or_add_transient`](Self::get_or_add_transient) for each value, in order
    pub fn get_or_add_transient_bulk<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<StringId>> {
        values
            .iter()
            .map(|v| self.get_or_add_transient(v.as_ref()))
            .collect()
    }

    /// Number of transient strings added through this proxy
    pub fn transient_count(&self) -> usize {
        self.transients.read().strings.len()
    }
}
