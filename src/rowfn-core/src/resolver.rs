//! Mapping runtime row-function calls back to analyzed call sites
//!
//! Compiled code only knows the name it was invoked under and an argument
//! position. The resolver indexes the execution unit's function targets by
//! [`NameKey`] once, then answers which dictionary backs a given argument.

use indexmap::IndexMap;
use log::{debug, warn};
use rowfn_plan::{ExecutionUnit, FunctionOper};
use rowfn_shared::ids::DictId;

use crate::error::InternalError;
use crate::name_key::NameKey;

/// Name-keyed index over the function call sites of one execution unit
#[derive(Debug)]
pub struct NameResolver<'a> {
    unit: &'a ExecutionUnit,
    // Target positions per key, in plan order
    call_sites: IndexMap<NameKey, Vec<usize>>,
    // First call site whose own name cannot be canonicalized
    malformed: Option<(usize, InternalError)>,
}

impl<'a> NameResolver<'a> {
    /// Index the top-level function targets of `unit`
    ///
    /// A call site whose declared name starts with `__` is remembered rather
    /// than indexed: any lookup that would scan past it fails with
    /// [`InternalError::EmptyFunctionName`].
    pub fn new(unit: &'a ExecutionUnit) -> Self {
        let mut call_sites: IndexMap<NameKey, Vec<usize>> = IndexMap::new();
        let mut malformed = None;
        for (idx, op) in unit.function_opers() {
            match NameKey::new(op.name()) {
                Ok(key) => call_sites.entry(key).or_default().push(idx),
                Err(e) => {
                    warn!("call site {} at target {} is malformed: {}", op, idx, e);
                    malformed.get_or_insert((idx, e));
                }
            }
        }
        debug!(
            "indexed {} call site names over {} targets",
            call_sites.len(),
            unit.target_exprs().len()
        );
        Self {
            unit,
            call_sites,
            malformed,
        }
    }

    /// Dictionary bound to argument `arg_index` of the call invoked as `function_name`
    ///
    /// Candidates sharing the name key are tried in plan order; the first one
    /// whose argument at `arg_index` is dictionary-encoded text wins.
    pub fn resolve_dictionary_id(
        &self,
        function_name: &str,
        arg_index: usize,
    ) -> Result<DictId, InternalError> {
        let key = NameKey::new(function_name)?;
        let candidates: Vec<_> = self.candidates(&key).collect();
        self.select(function_name, &key, &candidates, arg_index)
    }

    /// Like [`resolve_dictionary_id`](Self::resolve_dictionary_id), restricted
    /// to call sites declaring exactly `arity` arguments
    pub fn resolve_dictionary_id_with_arity(
        &self,
        function_name: &str,
        arity: usize,
        arg_index: usize,
    ) -> Result<DictId, InternalError> {
        let key = NameKey::new(function_name)?;
        let candidates: Vec<_> = self
            .candidates(&key)
            .filter(|(_, op)| op.arity() == arity)
            .collect();
        self.select(function_name, &key, &candidates, arg_index)
    }

    /// Call sites sharing the name key of `function_name`, in plan order
    pub fn call_sites(&self, function_name: &str) -> Result<Vec<&'a FunctionOper>, InternalError> {
        let key = NameKey::new(function_name)?;
        Ok(self.candidates(&key).map(|(_, op)| op).collect())
    }

    /// Number of distinct name keys in the unit
    pub fn len(&self) -> usize {
        self.call_sites.len()
    }

    /// Whether the unit has no function call targets
    pub fn is_empty(&self) -> bool {
        self.call_sites.is_empty()
    }

    fn candidates(&self, key: &NameKey) -> impl Iterator<Item = (usize, &'a FunctionOper)> + '_ {
        let unit = self.unit;
        self.call_sites
            .get(key)
            .into_iter()
            .flatten()
            .filter_map(move |&idx| {
                unit.target_exprs()[idx]
                    .as_function_oper()
                    .map(|op| (idx, op))
            })
    }

    fn select(
        &self,
        function_name: &str,
        key: &NameKey,
        candidates: &[(usize, &FunctionOper)],
        arg_index: usize,
    ) -> Result<DictId, InternalError> {
        // A plan-order scan reaches a malformed call site before any later match
        if let Some((bad_idx, e)) = &self.malformed {
            if candidates.first().map_or(true, |&(idx, _)| *bad_idx < idx) {
                return Err(e.clone());
            }
        }

        let mut chosen: Option<(&FunctionOper, DictId)> = None;
        let mut first_failure = None;

        for &(_, op) in candidates {
            match dict_id_of_arg(op, arg_index) {
                Ok(dict_id) => match chosen {
                    None => chosen = Some((op, dict_id)),
                    Some((first, first_id)) if first_id != dict_id => warn!(
                        "'{}' argument {} is ambiguous: {} binds dictionary {}, {} binds {}; using {}",
                        function_name, arg_index, first, first_id, op, dict_id, first_id
                    ),
                    Some(_) => {}
                },
                Err(e) => {
                    if chosen.is_none() && first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        match (chosen, first_failure) {
            (Some((op, dict_id)), _) => {
                debug!(
                    "'{}' argument {} resolved to dictionary {} via {}",
                    function_name, arg_index, dict_id, op
                );
                Ok(dict_id)
            }
            (None, Some(e)) => Err(e),
            (None, None) => Err(InternalError::NoMatchingCallSite {
                name: function_name.to_string(),
                name_key: key.to_string(),
            }),
        }
    }
}

fn dict_id_of_arg(op: &FunctionOper, arg_index: usize) -> Result<DictId, InternalError> {
    let arg = op.arg(arg_index).ok_or_else(|| InternalError::ArgumentOutOfRange {
        function: op.name().to_string(),
        arg_index,
        arity: op.arity(),
    })?;
    let type_info = arg.type_info();
    type_info
        .dict_id()
        .ok_or_else(|| InternalError::NotDictionaryEncoded {
            function: op.name().to_string(),
            arg_index,
            found: type_info.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowfn_plan::{Datum, Expr, SqlTypeKind, TypeInfo};

    fn int() -> TypeInfo {
        TypeInfo::scalar(SqlTypeKind::Int)
    }

    fn unit() -> ExecutionUnit {
        ExecutionUnit::new(vec![
            Expr::column("id", int()),
            Expr::function(
                "Pad__text",
                TypeInfo::text_dict(3),
                vec![
                    Expr::column("name", TypeInfo::text_dict(3)),
                    Expr::constant(Datum::Int(10), int()),
                ],
            ),
            Expr::function(
                "tags_joined",
                TypeInfo::text_dict(8),
                vec![Expr::column("tags", TypeInfo::text_dict_array(8))],
            ),
        ])
    }

    #[test]
    fn test_resolves_suffixed_and_cased_names() {
        let unit = unit();
        let resolver = NameResolver::new(&unit);
        assert_eq!(resolver.resolve_dictionary_id("pad", 0), Ok(3));
        assert_eq!(resolver.resolve_dictionary_id("PAD__anything", 0), Ok(3));
        assert_eq!(resolver.resolve_dictionary_id("Tags_Joined__v2", 0), Ok(8));
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_argument_out_of_range() {
        let unit = unit();
        let resolver = NameResolver::new(&unit);
        assert_eq!(
            resolver.resolve_dictionary_id("pad", 2),
            Err(InternalError::ArgumentOutOfRange {
                function: "Pad__text".into(),
                arg_index: 2,
                arity: 2,
            })
        );
    }

    #[test]
    fn test_argument_not_dictionary_encoded() {
        let unit = unit();
        let resolver = NameResolver::new(&unit);
        assert_eq!(
            resolver.resolve_dictionary_id("pad", 1),
            Err(InternalError::NotDictionaryEncoded {
                function: "Pad__text".into(),
                arg_index: 1,
                found: "INTEGER".into(),
            })
        );
    }

    #[test]
    fn test_unknown_function() {
        let unit = unit();
        let resolver = NameResolver::new(&unit);
        assert_eq!(
            resolver.resolve_dictionary_id("Trim__1", 0),
            Err(InternalError::NoMatchingCallSite {
                name: "Trim__1".into(),
                name_key: "trim".into(),
            })
        );
        assert!(matches!(
            resolver.resolve_dictionary_id("__pad", 0),
            Err(InternalError::EmptyFunctionName { .. })
        ));
    }

    #[test]
    fn test_overloads_prefer_a_dictionary_argument() {
        let unit = ExecutionUnit::new(vec![
            Expr::function("fmt__i", TypeInfo::text(), vec![Expr::column("n", int())]),
            Expr::function(
                "fmt__t",
                TypeInfo::text_dict(4),
                vec![Expr::column("s", TypeInfo::text_dict(4))],
            ),
        ]);
        let resolver = NameResolver::new(&unit);
        assert_eq!(resolver.resolve_dictionary_id("fmt", 0), Ok(4));
        assert_eq!(resolver.call_sites("FMT").unwrap().len(), 2);
    }

    #[test]
    fn test_first_failure_reported_when_no_overload_qualifies() {
        let unit = ExecutionUnit::new(vec![
            Expr::function("f__a", TypeInfo::text(), vec![]),
            Expr::function("f__b", TypeInfo::text(), vec![Expr::column("n", int())]),
        ]);
        let resolver = NameResolver::new(&unit);
        assert!(matches!(
            resolver.resolve_dictionary_id("f", 0),
            Err(InternalError::ArgumentOutOfRange { arity: 0, .. })
        ));
    }

    #[test]
    fn test_arity_filter_selects_overload() {
        let unit = ExecutionUnit::new(vec![
            Expr::function(
                "cat__2",
                TypeInfo::text_dict(1),
                vec![
                    Expr::column("a", TypeInfo::text_dict(1)),
                    Expr::column("b", TypeInfo::text_dict(1)),
                ],
            ),
            Expr::function(
                "cat__3",
                TypeInfo::text_dict(2),
                vec![
                    Expr::column("a", TypeInfo::text_dict(2)),
                    Expr::column("b", TypeInfo::text_dict(2)),
                    Expr::column("c", TypeInfo::text_dict(2)),
                ],
            ),
        ]);
        let resolver = NameResolver::new(&unit);

        // Plan order wins without an arity hint
        assert_eq!(resolver.resolve_dictionary_id("cat", 0), Ok(1));
        assert_eq!(resolver.resolve_dictionary_id_with_arity("cat", 3, 0), Ok(2));
        assert_eq!(resolver.resolve_dictionary_id_with_arity("cat", 2, 1), Ok(1));
        assert!(matches!(
            resolver.resolve_dictionary_id_with_arity("cat", 4, 0),
            Err(InternalError::NoMatchingCallSite { .. })
        ));
    }

    #[test]
    fn test_malformed_call_site_ahead_of_match_is_fatal() {
        let unit = ExecutionUnit::new(vec![
            Expr::function(
                "__bad",
                TypeInfo::text_dict(1),
                vec![Expr::column("a", TypeInfo::text_dict(1))],
            ),
            Expr::function(
                "good",
                TypeInfo::text_dict(2),
                vec![Expr::column("b", TypeInfo::text_dict(2))],
            ),
        ]);
        let resolver = NameResolver::new(&unit);
        let expected = Err(InternalError::EmptyFunctionName {
            name: "__bad".into(),
        });
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.resolve_dictionary_id("good", 0), expected);
        assert_eq!(resolver.resolve_dictionary_id("bad", 0), expected);
        assert_eq!(resolver.resolve_dictionary_id_with_arity("good", 1, 0), expected);
    }

    #[test]
    fn test_malformed_call_site_after_match_is_not_reached() {
        let unit = ExecutionUnit::new(vec![
            Expr::function(
                "good",
                TypeInfo::text_dict(2),
                vec![Expr::column("b", TypeInfo::text_dict(2))],
            ),
            Expr::function("__bad", TypeInfo::text(), vec![]),
        ]);
        let resolver = NameResolver::new(&unit);
        assert_eq!(resolver.resolve_dictionary_id("GOOD__x", 0), Ok(2));
        // Nothing matches, so the scan runs into the malformed name
        assert_eq!(
            resolver.resolve_dictionary_id("other", 0),
            Err(InternalError::EmptyFunctionName {
                name: "__bad".into()
            })
        );
        assert!(matches!(
            resolver.resolve_dictionary_id_with_arity("good", 3, 0),
            Err(InternalError::EmptyFunctionName { .. })
        ));
    }

    #[test]
    fn test_plan_without_function_calls() {
        let unit = ExecutionUnit::new(vec![Expr::column("id", int())]);
        let resolver = NameResolver::new(&unit);
        assert!(matches!(
            resolver.resolve_dictionary_id("anything", 0),
            Err(InternalError::NoMatchingCallSite { .. })
        ));
    }
}
