//! Facade handed to compiled row functions

use rowfn_plan::ExecutionUnit;
use rowfn_shared::ids::{DictId, StringId};

use crate::bridge::{DictionaryBridge, DictionaryHandle};
use crate::error::Result;
use crate::executor::{ExecutionContext, Executor};
use crate::resolver::NameResolver;

/// Everything a row function needs to work with dictionary-encoded text
///
/// Built once per execution unit. The dictionary id of an argument is
/// expected to be resolved once and reused for every row.
///
/// # Examples
///
/// ```rust
/// use rowfn_core::{Executor, RowFunctionManager};
/// use rowfn_dict::{DictionaryCatalog, StringDictionary};
/// use rowfn_plan::{ExecutionUnit, Expr, TypeInfo};
///
/// let mut catalog = DictionaryCatalog::new();
/// catalog.insert(StringDictionary::from_strings(3, ["Oslo", "Lima"])?);
/// let executor = Executor::new(catalog);
/// let unit = ExecutionUnit::new(vec![Expr::function(
///     "shout__t",
///     TypeInfo::text_dict(3),
///     vec![Expr::column("city", TypeInfo::text_dict(3))],
/// )]);
///
/// let manager = RowFunctionManager::new(&executor, &unit);
/// let dict_id = manager.dictionary_id("SHOUT", 0)?;
/// let loud = manager.string(dict_id, 1)?.to_uppercase();
/// let id = manager.get_or_add_transient(dict_id, &loud)?;
/// assert_eq!(manager.string(dict_id, id)?, "LIMA");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RowFunctionManager<'a, C: ExecutionContext + ?Sized = Executor> {
    resolver: NameResolver<'a>,
    bridge: DictionaryBridge<'a, C>,
}

impl<'a, C: ExecutionContext + ?Sized> RowFunctionManager<'a, C> {
    /// Create the facade for one execution unit
    pub fn new(executor: &'a C, exe_unit: &'a ExecutionUnit) -> Self {
        Self {
            resolver: NameResolver::new(exe_unit),
            bridge: DictionaryBridge::new(executor),
        }
    }

    /// Dictionary backing argument `arg_idx` of the function invoked as `func_name`
    pub fn dictionary_id(&self, func_name: &str, arg_idx: usize) -> Result<DictId> {
        Ok(self.resolver.resolve_dictionary_id(func_name, arg_idx)?)
    }

    /// Like [`dictionary_id`](Self::dictionary_id) for the overload with `arity` arguments
    pub fn dictionary_id_with_arity(
        &self,
        func_name: &str,
        arity: usize,
        arg_idx: usize,
    ) -> Result<DictId> {
        Ok(self
            .resolver
            .resolve_dictionary_id_with_arity(func_name, arity, arg_idx)?)
    }

    /// Decode `string_id` in dictionary `dict_id`
    pub fn string(&self, dict_id: DictId, string_id: StringId) -> Result<String> {
        self.bridge.string(dict_id, string_id)
    }

    /// Decode several ids of dictionary `dict_id`
    pub fn strings(&self, dict_id: DictId, string_ids: &[StringId]) -> Result<Vec<String>> {
        self.bridge.strings(dict_id, string_ids)
    }

    /// Id of `value` in dictionary `dict_id`, transient if the dictionary lacks it
    pub fn get_or_add_transient(&self, dict_id: DictId, value: &str) -> Result<StringId> {
        self.bridge.get_or_add_transient(dict_id, value)
    }

    /// Transient-interning of several values
    pub fn get_or_add_transient_bulk<S: AsRef<str>>(
        &self,
        dict_id: DictId,
        values: &[S],
    ) -> Result<Vec<StringId>> {
        self.bridge.get_or_add_transient_bulk(dict_id, values)
    }

    /// Handle to the proxy of `dict_id` for generated code
    pub fn dictionary_handle(&self, dict_id: DictId) -> Result<DictionaryHandle<'a>> {
        self.bridge.dictionary_handle(dict_id)
    }

    /// The name resolver
    pub fn resolver(&self) -> &NameResolver<'a> {
        &self.resolver
    }
}
