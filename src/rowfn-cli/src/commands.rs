//! Subcommand implementations
//!
//! Each command loads the documents it needs, runs the row-function
//! bridge against them and writes plain-text results to `out`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rowfn_core::{Executor, RowFunctionManager};
use rowfn_dict::DictionaryCatalog;
use rowfn_plan::ExecutionUnit;
use rowfn_shared::error::{config_error, input_error};
use rowfn_shared::ids::{DictId, StringId};
use rowfn_shared::Result;

use crate::config::{create_default_config_file, Config};

/// Options of the `resolve` command
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Function name as invoked
    pub function: String,
    /// Zero-based argument position
    pub arg_index: usize,
    /// Exact arity of the call site, if known
    pub arity: Option<usize>,
    /// Whether to list every matching call site
    pub candidates: bool,
}

/// Load the dictionary document named by the configuration
pub fn load_catalog(config: &Config) -> Result<DictionaryCatalog> {
    let path = required_path(config.dictionaries.path.as_ref(), "dictionary document")?;
    DictionaryCatalog::load_json(path)
        .with_context(|| format!("Failed to load dictionaries from {}", path.display()))
}

/// Load the execution unit named by the configuration
pub fn load_plan(config: &Config) -> Result<ExecutionUnit> {
    let path = required_path(config.plan.path.as_ref(), "plan document")?;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan {}", path.display()))?;
    ExecutionUnit::from_json(&json)
        .map_err(|e| input_error(format!("Invalid plan {}: {e}", path.display())))
}

fn required_path<'a>(path: Option<&'a PathBuf>, what: &str) -> Result<&'a Path> {
    path.map(PathBuf::as_path).ok_or_else(|| {
        config_error(format!(
            "No {what} given; pass it on the command line, in the config file or the environment"
        ))
    })
}

/// Print the dictionary bound to the requested argument
pub fn resolve(
    config: &Config,
    request: &ResolveRequest,
    out: &mut impl Write,
) -> Result<DictId> {
    if config.resolve.strict_arity && request.arity.is_none() {
        return Err(config_error(
            "strict_arity is enabled; pass --arity to resolve",
        ));
    }

    let unit = load_plan(config)?;
    let catalog = match config.dictionaries.path {
        Some(_) => load_catalog(config)?,
        None => DictionaryCatalog::new(),
    };
    let executor = Executor::new(catalog);
    let manager = RowFunctionManager::new(&executor, &unit);

    if request.candidates {
        for op in manager.resolver().call_sites(&request.function)? {
            writeln!(out, "candidate: {op}")?;
        }
    }

    let dict_id = match request.arity {
        Some(arity) => {
            manager.dictionary_id_with_arity(&request.function, arity, request.arg_index)?
        }
        None => manager.dictionary_id(&request.function, request.arg_index)?,
    };
    writeln!(out, "{dict_id}")?;
    Ok(dict_id)
}

/// Print the string bound to each id, one per line
pub fn decode(
    config: &Config,
    dict_id: DictId,
    ids: &[StringId],
    out: &mut impl Write,
) -> Result<()> {
    let executor = Executor::new(load_catalog(config)?);
    let unit = ExecutionUnit::default();
    let manager = RowFunctionManager::new(&executor, &unit);

    for (id, value) in ids.iter().zip(manager.strings(dict_id, ids)?) {
        writeln!(out, "{id}\t{value}")?;
    }
    Ok(())
}

/// Print the id of each value, adding transient entries for unknown ones
pub fn intern(
    config: &Config,
    dict_id: DictId,
    values: &[String],
    out: &mut impl Write,
) -> Result<Vec<StringId>> {
    let executor = Executor::new(load_catalog(config)?);
    let unit = ExecutionUnit::default();
    let manager = RowFunctionManager::new(&executor, &unit);

    let ids = manager.get_or_add_transient_bulk(dict_id, values)?;
    for (value, id) in values.iter().zip(&ids) {
        let kind = if rowfn_shared::ids::is_transient(*id) {
            "transient"
        } else {
            "persistent"
        };
        writeln!(out, "{value}\t{id}\t{kind}")?;
    }

    let handle = manager.dictionary_handle(dict_id)?;
    log::debug!(
        "dictionary {} holds {} transient strings",
        handle.dict_id(),
        handle.proxy().transient_count()
    );
    Ok(ids)
}

/// Print the effective configuration as YAML
pub fn show_config(config: &Config, out: &mut impl Write) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    write!(out, "{yaml}")?;
    Ok(())
}

/// Write a default configuration file
pub fn init_config(path: &Path, force: bool, out: &mut impl Write) -> Result<()> {
    if path.exists() && !force {
        return Err(config_error(format!(
            "Config file already exists: {}",
            path.display()
        )));
    }
    create_default_config_file(path)?;
    writeln!(out, "Created config file: {}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const PLAN: &str = r#"{
        "target_exprs": [
            {"expr": "column_var", "column": "id", "type_info": {"kind": "big_int"}},
            {
                "expr": "function_oper",
                "name": "pad__text",
                "type_info": {"kind": "text", "encoding": "dict", "comp_param": 4},
                "args": [
                    {"expr": "column_var", "column": "city",
                     "type_info": {"kind": "text", "encoding": "dict", "comp_param": 4}},
                    {"expr": "constant", "value": 8, "type_info": {"kind": "int"}}
                ]
            }
        ]
    }"#;

    fn fixture() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let dicts = dir.path().join("dicts.json");
        let plan = dir.path().join("unit.json");
        fs::write(&dicts, r#"{"4": ["Oslo", "Lima", "Pune"]}"#).unwrap();
        fs::write(&plan, PLAN).unwrap();

        let mut config = Config::default();
        config.dictionaries.path = Some(dicts);
        config.plan.path = Some(plan);
        (dir, config)
    }

    fn request(function: &str, arg_index: usize) -> ResolveRequest {
        ResolveRequest {
            function: function.to_string(),
            arg_index,
            arity: None,
            candidates: false,
        }
    }

    #[test]
    fn test_resolve_command() {
        let (_dir, config) = fixture();
        let mut out = Vec::new();
        let dict_id = resolve(&config, &request("PAD", 0), &mut out).unwrap();
        assert_eq!(dict_id, 4);
        assert_eq!(String::from_utf8(out).unwrap(), "4\n");
    }

    #[test]
    fn test_resolve_reports_internal_errors() {
        let (_dir, config) = fixture();
        let err = resolve(&config, &request("pad", 1), &mut Vec::new()).unwrap_err();
        let core = err.downcast_ref::<rowfn_core::Error>().unwrap();
        assert!(core.is_internal());
    }

    #[test]
    fn test_resolve_strict_arity() {
        let (_dir, mut config) = fixture();
        config.resolve.strict_arity = true;
        assert!(resolve(&config, &request("pad", 0), &mut Vec::new()).is_err());

        let mut req = request("pad", 0);
        req.arity = Some(2);
        req.candidates = true;
        let mut out = Vec::new();
        assert_eq!(resolve(&config, &req, &mut out).unwrap(), 4);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("candidate: pad__text("));
        assert!(text.ends_with("4\n"));
    }

    #[test]
    fn test_resolve_requires_plan() {
        let (_dir, mut config) = fixture();
        config.plan.path = None;
        let err = resolve(&config, &request("pad", 0), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: No plan document"));
    }

    #[test]
    fn test_decode_command() {
        let (_dir, config) = fixture();
        let mut out = Vec::new();
        decode(&config, 4, &[2, 0], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2\tPune\n0\tOslo\n");

        assert!(decode(&config, 4, &[9], &mut Vec::new()).is_err());
        assert!(decode(&config, 5, &[0], &mut Vec::new()).is_err());
    }

    #[test]
    fn test_intern_command() {
        let (_dir, config) = fixture();
        let values = vec!["Lima".to_string(), "Kyiv".to_string(), "Kyiv".to_string()];
        let mut out = Vec::new();
        let ids = intern(&config, 4, &values, &mut out).unwrap();
        assert_eq!(ids, vec![1, -2, -2]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Lima\t1\tpersistent\nKyiv\t-2\ttransient\nKyiv\t-2\ttransient\n"
        );
    }

    #[test]
    fn test_config_commands() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rowfn.toml");

        init_config(&path, false, &mut Vec::new()).unwrap();
        assert!(path.exists());
        assert!(init_config(&path, false, &mut Vec::new()).is_err());
        init_config(&path, true, &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        show_config(&Config::default(), &mut out).unwrap();
        let yaml = String::from_utf8(out).unwrap();
        assert!(yaml.contains("strict_arity: false"));
        assert!(yaml.contains("verbosity: 0"));
    }
}
