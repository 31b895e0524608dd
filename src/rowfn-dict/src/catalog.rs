//! Dictionaries visible to a query, keyed by dictionary id

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use rowfn_shared::ids::DictId;

use crate::dictionary::StringDictionary;
use crate::{Error, Result};

/// Registry of shared string dictionaries
#[derive(Debug, Clone, Default)]
pub struct DictionaryCatalog {
    dictionaries: BTreeMap<DictId, Arc<StringDictionary>>,
}

impl DictionaryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dictionary under its own id, replacing any previous one
    pub fn insert(&mut self, dictionary: StringDictionary) -> Arc<StringDictionary> {
        let dictionary = Arc::new(dictionary);
        self.dictionaries
            .insert(dictionary.dict_id(), Arc::clone(&dictionary));
        dictionary
    }

    /// Dictionary registered under `dict_id`
    pub fn get(&self, dict_id: DictId) -> Result<Arc<StringDictionary>> {
        self.dictionaries
            .get(&dict_id)
            .cloned()
            .ok_or(Error::UnknownDictionary(dict_id))
    }

    /// Registered dictionary ids, ascending
    pub fn dict_ids(&self) -> impl Iterator<Item = DictId> + '_ {
        self.dictionaries.keys().copied()
    }

    /// Number of registered dictionaries
    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    /// Whether no dictionary is registered
    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }

    /// Build a catalog from a JSON document of the form
    /// `{"<dict id>": ["string 0", "string 1", ...], ...}`
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for (key, strings) in doc {
            let dict_id: DictId = key
                .trim()
                .parse()
                .map_err(|_| Error::InvalidDocument(format!("'{}' is not a dictionary id", key)))?;
            if catalog.dictionaries.contains_key(&dict_id) {
                return Err(Error::InvalidDocument(format!(
                    "dictionary id {} is given more than once",
                    dict_id
                )));
            }
            debug!("loaded dictionary {} with {} strings", dict_id, strings.len());
            catalog.insert(StringDictionary::from_strings(dict_id, strings)?);
        }
        Ok(catalog)
    }

    /// Read a catalog from a JSON file, see [`from_json`](Self::from_json)
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_insert_and_get() {
        let mut catalog = DictionaryCatalog::new();
        catalog.insert(StringDictionary::from_strings(4, ["x"]).unwrap());
        assert_eq!(catalog.get(4).unwrap().get_string(0), Some("x"));
        assert!(matches!(catalog.get(5), Err(Error::UnknownDictionary(5))));
    }

    #[test]
    fn test_from_json() {
        let catalog =
            DictionaryCatalog::from_json(r#"{"2": ["NY", "SF"], "10": ["red"]}"#).unwrap();
        assert_eq!(catalog.dict_ids().collect::<Vec<_>>(), vec![2, 10]);
        assert_eq!(catalog.get(2).unwrap().get_id("SF"), Some(1));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_bad_keys() {
        let err = DictionaryCatalog::from_json(r#"{"cities": ["NY"]}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid dictionary document: 'cities' is not a dictionary id"
        );
        assert!(matches!(
            DictionaryCatalog::from_json("[1, 2]"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        for doc in [r#"{"1": ["a"], " 1": ["b"]}"#, r#"{"01": ["a"], "1": ["b"]}"#] {
            let err = DictionaryCatalog::from_json(doc).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid dictionary document: dictionary id 1 is given more than once"
            );
        }
    }

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"1": ["a", "b"]}}"#).unwrap();
        let catalog = DictionaryCatalog::load_json(file.path()).unwrap();
        assert_eq!(catalog.get(1).unwrap().len(), 2);

        let missing = DictionaryCatalog::load_json(Path::new("/nonexistent/dicts.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
