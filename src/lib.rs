//! rowfn: lets compiled row functions work with dictionary-encoded text
//!
//! Re-exports the workspace crates under one name.

pub use rowfn_core as core;
pub use rowfn_dict as dict;
pub use rowfn_plan as plan;
pub use rowfn_shared as shared;

pub use rowfn_core::{Error, Executor, RowFunctionManager};
