//! Analyzed expression nodes
//!
//! These are the already-typed expressions an analyzer hands to execution.
//! Only the shapes needed to locate function call sites and their argument
//! types are modelled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TypeInfo;

/// An analyzed, typed expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum Expr {
    /// Reference to an input column
    ColumnVar(ColumnVar),
    /// Literal value
    Constant(Constant),
    /// Call of a (possibly user-defined) function
    FunctionOper(FunctionOper),
}

/// Column reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnVar {
    /// Owning table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Column name
    pub column: String,
    /// Column type
    pub type_info: TypeInfo,
}

/// Literal value with its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    /// The value
    pub value: Datum,
    /// Literal type
    pub type_info: TypeInfo,
}

/// Scalar literal payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    /// NULL
    Null,
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Double(f64),
    /// String literal
    Text(String),
}

/// A function call site as produced by the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionOper {
    /// Declared name, possibly carrying an overload suffix (`name__suffix`)
    pub name: String,
    /// Result type
    pub type_info: TypeInfo,
    /// Arguments in declaration order
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl Expr {
    /// Column reference without a table qualifier
    pub fn column(column: impl Into<String>, type_info: TypeInfo) -> Self {
        Expr::ColumnVar(ColumnVar {
            table: None,
            column: column.into(),
            type_info,
        })
    }

    /// Literal constant
    pub fn constant(value: Datum, type_info: TypeInfo) -> Self {
        Expr::Constant(Constant { value, type_info })
    }

    /// Function call
    pub fn function(name: impl Into<String>, type_info: TypeInfo, args: Vec<Expr>) -> Self {
        Expr::FunctionOper(FunctionOper::new(name, type_info, args))
    }

    /// Type of this expression
    pub fn type_info(&self) -> &TypeInfo {
        match self {
            Expr::ColumnVar(col) => &col.type_info,
            Expr::Constant(c) => &c.type_info,
            Expr::FunctionOper(op) => &op.type_info,
        }
    }

    /// The function call, if this expression is one
    pub fn as_function_oper(&self) -> Option<&FunctionOper> {
        match self {
            Expr::FunctionOper(op) => Some(op),
            _ => None,
        }
    }
}

impl FunctionOper {
    /// Create a call site
    pub fn new(name: impl Into<String>, type_info: TypeInfo, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            type_info,
            args,
        }
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Argument at `idx`
    pub fn arg(&self, idx: usize) -> Option<&Expr> {
        self.args.get(idx)
    }

    /// All arguments
    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::ColumnVar(col) => match &col.table {
                Some(table) => write!(f, "{}.{}", table, col.column),
                None => write!(f, "{}", col.column),
            },
            Expr::Constant(c) => write!(f, "{}", c.value),
            Expr::FunctionOper(op) => write!(f, "{}", op),
        }
    }
}

impl fmt::Display for FunctionOper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "NULL"),
            Datum::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Datum::Int(i) => write!(f, "{}", i),
            Datum::Double(d) => write!(f, "{}", d),
            Datum::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SqlTypeKind;
    use pretty_assertions::assert_eq;

    fn sample_call() -> Expr {
        Expr::function(
            "Pad__2",
            TypeInfo::text_dict(3),
            vec![
                Expr::column("name", TypeInfo::text_dict(3)),
                Expr::constant(Datum::Int(8), TypeInfo::scalar(SqlTypeKind::Int)),
                Expr::constant(Datum::Text("it's".into()), TypeInfo::text()),
            ],
        )
    }

    #[test]
    fn test_function_oper_accessors() {
        let expr = sample_call();
        let op = expr.as_function_oper().unwrap();
        assert_eq!(op.name(), "Pad__2");
        assert_eq!(op.arity(), 3);
        assert_eq!(op.arg(0).unwrap().type_info().dict_id(), Some(3));
        assert!(op.arg(3).is_none());
        assert_eq!(expr.type_info(), &TypeInfo::text_dict(3));
    }

    #[test]
    fn test_non_function_exprs() {
        let col = Expr::column("x", TypeInfo::scalar(SqlTypeKind::Double));
        assert!(col.as_function_oper().is_none());
        let lit = Expr::constant(Datum::Null, TypeInfo::text());
        assert!(lit.as_function_oper().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(sample_call().to_string(), "Pad__2(name, 8, 'it''s')");

        let qualified = Expr::ColumnVar(ColumnVar {
            table: Some("users".into()),
            column: "email".into(),
            type_info: TypeInfo::text_dict(1),
        });
        assert_eq!(qualified.to_string(), "users.email");
        assert_eq!(
            Expr::constant(Datum::Bool(true), TypeInfo::scalar(SqlTypeKind::Boolean)).to_string(),
            "TRUE"
        );
    }

    #[test]
    fn test_deserialize_function_oper() {
        let json = r#"{
            "expr": "function_oper",
            "name": "lower",
            "type_info": {"kind": "text", "encoding": "dict", "comp_param": 5},
            "args": [
                {"expr": "column_var", "column": "city",
                 "type_info": {"kind": "text", "encoding": "dict", "comp_param": 5}}
            ]
        }"#;
        let expr: Expr = serde_json::from_str(json).unwrap();
        assert_eq!(
            expr,
            Expr::function(
                "lower",
                TypeInfo::text_dict(5),
                vec![Expr::column("city", TypeInfo::text_dict(5))]
            )
        );
    }
}
