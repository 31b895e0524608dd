//! Execution units: the slice of an analyzed plan one compiled kernel runs

use serde::{Deserialize, Serialize};

use crate::expr::{Expr, FunctionOper};

/// One unit of query execution and its projected target expressions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionUnit {
    /// Projected expressions, in plan order
    #[serde(default)]
    pub target_exprs: Vec<Expr>,
}

impl ExecutionUnit {
    /// Create a unit from its target expressions
    pub fn new(target_exprs: Vec<Expr>) -> Self {
        Self { target_exprs }
    }

    /// Append a target expression
    #[must_use]
    pub fn with_target(mut self, expr: Expr) -> Self {
        self.target_exprs.push(expr);
        self
    }

    /// Target expressions in plan order
    pub fn target_exprs(&self) -> &[Expr] {
        &self.target_exprs
    }

    /// Top-level function call targets with their position in the target list
    pub fn function_opers(&self) -> impl Iterator<Item = (usize, &FunctionOper)> {
        self.target_exprs
            .iter()
            .enumerate()
            .filter_map(|(idx, expr)| expr.as_function_oper().map(|op| (idx, op)))
    }

    /// Parse a unit from its JSON representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize this unit as pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
