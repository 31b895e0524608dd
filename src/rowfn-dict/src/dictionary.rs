//! Persistent string storage for a dictionary-encoded column

use std::collections::HashMap;

use rowfn_shared::ids::{DictId, StringId};

use crate::{Error, Result};

/// Append-only mapping between non-negative string ids and strings
#[derive(Debug, Clone, Default)]
pub struct StringDictionary {
    dict_id: DictId,
    strings: Vec<String>,
    ids: HashMap<String, StringId>,
}

impl StringDictionary {
    /// Create an empty dictionary
    pub fn new(dict_id: DictId) -> Self {
        Self {
            dict_id,
            strings: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Create a dictionary holding `strings`; duplicates keep their first id
    pub fn from_strings<I, S>(dict_id: DictId, strings: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dict = Self::new(dict_id);
        for s in strings {
            dict.get_or_add(s)?;
        }
        Ok(dict)
    }

    /// Id of `value`, adding it if it is not present yet
    pub fn get_or_add(&mut self, value: impl Into<String>) -> Result<StringId> {
        let value = value.into();
        if let Some(&id) = self.ids.get(&value) {
            return Ok(id);
        }
        let id = StringId::try_from(self.strings.len())
            .map_err(|_| Error::IdSpaceExhausted(self.dict_id))?;
        self.ids.insert(value.clone(), id);
        self.strings.push(value);
        Ok(id)
    }

    /// Id of `value` if present
    pub fn get_id(&self, value: &str) -> Option<StringId> {
        self.ids.get(value).copied()
    }

    /// String stored under `id`
    pub fn get_string(&self, id: StringId) -> Option<&str> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.strings.get(idx))
            .map(String::as_str)
    }

    /// The dictionary's id
    pub fn dict_id(&self) -> DictId {
        self.dict_id
    }

    /// Number of stored strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
