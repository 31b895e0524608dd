//! Decode, transient intern and raw-handle export against dictionary proxies
//!
//! Every operation asks the execution context for the proxy with transient
//! creation allowed, so the proxy (and any transient ids it hands out) lives in
//! the query's memory owner. Dictionary failures are returned as they come.

use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::Arc;

use log::trace;
use rowfn_dict::StringDictionaryProxy;
use rowfn_shared::ids::{DictId, StringId};

use crate::error::Result;
use crate::executor::ExecutionContext;

/// Dictionary operations on behalf of a row function
#[derive(Debug)]
pub struct DictionaryBridge<'ctx, C: ExecutionContext + ?Sized> {
    context: &'ctx C,
}

/// Borrowed capability to a dictionary proxy
///
/// The handle cannot outlive the execution context it came from. The raw
/// pointer from [`as_ptr`](Self::as_ptr) is for generated code that talks to
/// the proxy directly; it stays valid while the context's memory owner lives.
#[derive(Debug, Clone)]
pub struct DictionaryHandle<'ctx> {
    proxy: Arc<StringDictionaryProxy>,
    _context: PhantomData<&'ctx ()>,
}

impl<'ctx, C: ExecutionContext + ?Sized> DictionaryBridge<'ctx, C> {
    /// Create a bridge over `context`
    pub fn new(context: &'ctx C) -> Self {
        Self { context }
    }

    fn proxy(&self, dict_id: DictId) -> Result<Arc<StringDictionaryProxy>> {
        let owner = self.context.row_set_memory_owner();
        Ok(self.context.string_dictionary_proxy(dict_id, owner, true)?)
    }

    /// String bound to `string_id` in dictionary `dict_id`
    pub fn string(&self, dict_id: DictId, string_id: StringId) -> Result<String> {
        trace!("decode dictionary {} id {}", dict_id, string_id);
        Ok(self.proxy(dict_id)?.get_string(string_id)?)
    }

    /// Strings bound to each of `string_ids`, in order
    pub fn strings(&self, dict_id: DictId, string_ids: &[StringId]) -> Result<Vec<String>> {
        Ok(self.proxy(dict_id)?.get_strings(string_ids)?)
    }

    /// Id for `value`, adding a query-scoped transient entry when the
    /// dictionary does not hold it
    pub fn get_or_add_transient(&self, dict_id: DictId, value: &str) -> Result<StringId> {
        Ok(self.proxy(dict_id)?.get_or_add_transient(value)?)
    }

    /// [`get_or_add_transient`](Self::get_or_add_transient) for each value, in order
    pub fn get_or_add_transient_bulk<S: AsRef<str>>(
        &self,
        dict_id: DictId,
        values: &[S],
    ) -> Result<Vec<StringId>> {
        Ok(self.proxy(dict_id)?.get_or_add_transient_bulk(values)?)
    }

    /// Handle to the proxy of `dict_id`
    pub fn dictionary_handle(&self, dict_id: DictId) -> Result<DictionaryHandle<'ctx>> {
        Ok(DictionaryHandle {
            proxy: self.proxy(dict_id)?,
            _context: PhantomData,
        })
    }
}

impl DictionaryHandle<'_> {
    /// Id of the dictionary behind the handle
    pub fn dict_id(&self) -> DictId {
        self.proxy.dict_id()
    }

    /// Typed access to the proxy
    pub fn proxy(&self) -> &StringDictionaryProxy {
        &self.proxy
    }

    /// Untyped, non-null pointer to the proxy
    pub fn as_ptr(&self) -> NonNull<c_void> {
        NonNull::from(&*self.proxy).cast()
    }
}

/// Recover the proxy behind a pointer obtained from [`DictionaryHandle::as_ptr`]
///
/// # Safety
///
/// `ptr` must come from [`DictionaryHandle::as_ptr`], and the memory owner of
/// the execution context that produced the handle must outlive `'a`.
pub unsafe fn proxy_from_raw<'a>(ptr: NonNull<c_void>) -> &'a StringDictionaryProxy {
    // SAFETY: the caller guarantees the pointer targets a live proxy
    ptr.cast::<StringDictionaryProxy>().as_ref()
}
