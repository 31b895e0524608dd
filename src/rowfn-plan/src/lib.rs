//! rowfn-plan: Analyzed expressions consumed by the row-function bridge
//!
//! The analyzer and compiler live upstream; this crate only models what
//! they hand over: typed target expressions grouped into execution units.
//!
//! # Example
//!
//! ```rust
//! use rowfn_plan::{ExecutionUnit, Expr, TypeInfo};
//!
//! let unit = ExecutionUnit::new(vec![Expr::function(
//!     "lower",
//!     TypeInfo::text_dict(3),
//!     vec![Expr::column("city", TypeInfo::text_dict(3))],
//! )]);
//! assert_eq!(unit.function_opers().count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod expr;
pub mod types;
pub mod unit;

pub use expr::{ColumnVar, Constant, Datum, Expr, FunctionOper};
pub use types::{Encoding, SqlTypeKind, TypeInfo};
pub use unit::ExecutionUnit;
