//! Execution context: per-query ownership of dictionary proxies

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use rowfn_dict::{DictionaryCatalog, StringDictionary, StringDictionaryProxy};
use rowfn_shared::ids::DictId;

/// What the bridge needs from the engine running a query
pub trait ExecutionContext {
    /// Owner of the current query's per-query allocations
    fn row_set_memory_owner(&self) -> &Arc<RowSetMemoryOwner>;

    /// Proxy for `dict_id`
    ///
    /// With `with_transients` the proxy is registered in `owner` (created on
    /// first use) so transient ids stay consistent for the rest of the query.
    /// Without it, an already registered proxy is reused, otherwise a
    /// standalone read-only view is returned and nothing is registered.
    fn string_dictionary_proxy(
        &self,
        dict_id: DictId,
        owner: &Arc<RowSetMemoryOwner>,
        with_transients: bool,
    ) -> rowfn_dict::Result<Arc<StringDictionaryProxy>>;
}

/// Per-query owner of dictionary proxies
///
/// Proxies are created at most once per dictionary id and are kept until the
/// owner is dropped.
#[derive(Debug, Default)]
pub struct RowSetMemoryOwner {
    proxies: Mutex<HashMap<DictId, Arc<StringDictionaryProxy>>>,
}

impl RowSetMemoryOwner {
    /// Create an owner with no proxies
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered proxy for the dictionary, creating it if needed
    pub fn get_or_add_proxy(&self, dictionary: &Arc<StringDictionary>) -> Arc<StringDictionaryProxy> {
        let mut proxies = self.proxies.lock();
        let proxy = proxies.entry(dictionary.dict_id()).or_insert_with(|| {
            debug!("creating proxy for dictionary {}", dictionary.dict_id());
            Arc::new(StringDictionaryProxy::new(Arc::clone(dictionary)))
        });
        Arc::clone(proxy)
    }

    /// Registered proxy for `dict_id`, if any
    pub fn proxy(&self, dict_id: DictId) -> Option<Arc<StringDictionaryProxy>> {
        self.proxies.lock().get(&dict_id).cloned()
    }

    /// Number of registered proxies
    pub fn proxy_count(&self) -> usize {
        self.proxies.lock().len()
    }
}

/// Execution context backed by an in-memory dictionary catalog
#[derive(Debug)]
pub struct Executor {
    catalog: DictionaryCatalog,
    row_set_mem_owner: Arc<RowSetMemoryOwner>,
}

impl Executor {
    /// Create an executor over `catalog` with a fresh memory owner
    pub fn new(catalog: DictionaryCatalog) -> Self {
        Self {
            catalog,
            row_set_mem_owner: Arc::new(RowSetMemoryOwner::new()),
        }
    }

    /// Dictionaries visible to queries run by this executor
    pub fn catalog(&self) -> &DictionaryCatalog {
        &self.catalog
    }
}

impl ExecutionContext for Executor {
    fn row_set_memory_owner(&self) -> &Arc<RowSetMemoryOwner> {
        &self.row_set_mem_owner
    }

    fn string_dictionary_proxy(
        &self,
        dict_id: DictId,
        owner: &Arc<RowSetMemoryOwner>,
        with_transients: bool,
    ) -> rowfn_dict::Result<Arc<StringDictionaryProxy>> {
        let dictionary = self.catalog.get(dict_id)?;
        if with_transients {
            return Ok(owner.get_or_add_proxy(&dictionary));
        }
        Ok(owner
            .proxy(dict_id)
            .unwrap_or_else(|| Arc::new(StringDictionaryProxy::new(dictionary))))
    }
}
