//! Values parser for loading and merging chart values.
//!
//! This module handles values files and `--set` expressions the way Helm
//! layers them: files are deep-merged in order, `--set` pairs are applied
//! last, and the merged tree is coerced once into [`ChartValues`].

use crate::error::{AutoDeployError, ConfigError, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::ChartValues;

/// Largest list index accepted in a `--set` key.
const MAX_INDEX: usize = 65_536;

/// Parser for chart values.
#[derive(Debug, Default)]
pub struct ValuesParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

/// One segment of a `--set` key path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Key(String),
    Index(usize),
}

impl ValuesParser {
    /// Creates a new values parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads values files and `--set` expressions into typed chart values.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read, an expression is
    /// malformed, or a value does not coerce to its declared type.
    pub fn load_values(
        &self,
        files: &[PathBuf],
        sets: &[String],
        set_strings: &[String],
    ) -> Result<ChartValues> {
        let mut tree = Value::Mapping(Mapping::new());

        for file in files {
            let overlay = self.load_file(file)?;
            merge(&mut tree, overlay);
        }

        for expression in sets {
            self.apply_set(&mut tree, expression)?;
        }

        for expression in set_strings {
            self.apply_set_string(&mut tree, expression)?;
        }

        self.into_values(tree)
    }

    /// Loads a values tree from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = self.resolve_path(path.as_ref());
        info!("Loading values from: {}", path.display());

        if !path.exists() {
            return Err(AutoDeployError::Config(ConfigError::FileNotFound { path }));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            AutoDeployError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(&path))
    }

    /// Parses a values tree from a YAML string.
    ///
    /// An empty document is an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or its root is not a map.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<Value> {
        debug!("Parsing YAML values");

        let location = || source.map(|p| p.display().to_string());
        let value: Value = serde_yaml::from_str(content).map_err(|e| {
            AutoDeployError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: location(),
            })
        })?;

        match value {
            Value::Null => Ok(Value::Mapping(Mapping::new())),
            Value::Mapping(_) => Ok(value),
            _ => Err(AutoDeployError::Config(ConfigError::ParseError {
                message: String::from("values root must be a map"),
                location: location(),
            })),
        }
    }

    /// Applies a `--set` expression, inferring scalar types.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is malformed.
    pub fn apply_set(&self, tree: &mut Value, expression: &str) -> Result<()> {
        apply_expression(tree, expression, true)
    }

    /// Applies a `--set-string` expression; every value stays a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is malformed.
    pub fn apply_set_string(&self, tree: &mut Value, expression: &str) -> Result<()> {
        apply_expression(tree, expression, false)
    }

    /// Coerces a merged values tree into typed chart values.
    ///
    /// Null entries are removed first so their defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if a value does not coerce to its declared type.
    pub fn into_values(&self, mut tree: Value) -> Result<ChartValues> {
        prune_nulls(&mut tree);
        if tree.is_null() {
            tree = Value::Mapping(Mapping::new());
        }

        let values: ChartValues = serde_yaml::from_value(tree).map_err(|e| {
            AutoDeployError::Config(ConfigError::ParseError {
                message: format!("Invalid values: {e}"),
                location: None,
            })
        })?;

        debug!("Coerced values with {} worker(s)", values.workers.len());
        Ok(values)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                AutoDeployError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Deep-merges `overlay` into `base`; maps merge key by key, anything else
/// is replaced.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

fn prune_nulls(value: &mut Value) {
    match value {
        Value::Mapping(map) => {
            let entries = std::mem::take(map);
            for (key, mut child) in entries {
                prune_nulls(&mut child);
                if !child.is_null() {
                    map.insert(key, child);
                }
            }
        }
        Value::Sequence(items) => items.iter_mut().for_each(prune_nulls),
        _ => {}
    }
}

fn apply_expression(tree: &mut Value, expression: &str, infer: bool) -> Result<()> {
    for pair in split_unescaped(expression, ',', true) {
        if pair.trim().is_empty() {
            continue;
        }

        let (key, raw) = split_key_value(&pair)
            .ok_or_else(|| ConfigError::invalid_set(expression, format!("key \"{pair}\" has no value")))?;

        let path = parse_key(&key).map_err(|reason| ConfigError::invalid_set(expression, reason))?;
        let value = parse_value(&raw, infer);

        debug!("Setting {key}");
        set_path(tree, &path, value).map_err(|reason| ConfigError::invalid_set(expression, reason))?;
    }
    Ok(())
}

/// Splits on `sep` outside of `{...}` lists, honoring backslash escapes.
/// Escapes are kept so later stages can interpret them.
fn split_unescaped(input: &str, sep: char, respect_braces: bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '{' if respect_braces => {
                depth += 1;
                current.push(c);
            }
            '}' if respect_braces => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c == sep && depth == 0 => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn split_key_value(pair: &str) -> Option<(String, String)> {
    let mut escaped = false;
    for (i, c) in pair.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '=' if !escaped => return Some((pair[..i].to_string(), pair[i + 1..].to_string())),
            _ => escaped = false,
        }
    }
    None
}

fn parse_key(key: &str) -> std::result::Result<Vec<PathSegment>, String> {
    let mut segments = Vec::new();

    for part in split_unescaped(key.trim(), '.', false) {
        let (name, indices) = split_indices(&part)?;
        let name = unescape(&name);
        if name.is_empty() {
            return Err(format!("empty key segment in \"{key}\""));
        }
        segments.push(PathSegment::Key(name));
        segments.extend(indices.into_iter().map(PathSegment::Index));
    }

    Ok(segments)
}

/// Splits `name[0][1]` into `name` and its indices.
fn split_indices(part: &str) -> std::result::Result<(String, Vec<usize>), String> {
    let Some(open) = part.find('[') else {
        return Ok((part.to_string(), Vec::new()));
    };

    let name = part[..open].to_string();
    let mut indices = Vec::new();
    let mut rest = &part[open..];

    while !rest.is_empty() {
        let close = rest
            .find(']')
            .ok_or_else(|| format!("unterminated index in \"{part}\""))?;
        if !rest.starts_with('[') {
            return Err(format!("unexpected characters in \"{part}\""));
        }
        let index: usize = rest[1..close]
            .trim()
            .parse()
            .map_err(|_| format!("invalid index in \"{part}\""))?;
        if index > MAX_INDEX {
            return Err(format!("index {index} exceeds maximum of {MAX_INDEX}"));
        }
        indices.push(index);
        rest = &rest[close + 1..];
    }

    Ok((name, indices))
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_value(raw: &str, infer: bool) -> Value {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('{') && trimmed.ends_with('}') {
        let inner = &trimmed[1..trimmed.len() - 1];
        let items = split_unescaped(inner, ',', false)
            .iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| typed_scalar(&unescape(item.trim()), infer))
            .collect();
        return Value::Sequence(items);
    }
    typed_scalar(&unescape(raw), infer)
}

/// Infers a scalar type the way `--set` does: booleans, `null`, and
/// integers without a leading zero; everything else is a string.
fn typed_scalar(raw: &str, infer: bool) -> Value {
    if !infer {
        return Value::String(raw.to_string());
    }

    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let leading_zero = digits.len() > 1 && digits.starts_with('0');
    if !leading_zero {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(n.into());
        }
    }

    Value::String(raw.to_string())
}

fn set_path(node: &mut Value, path: &[PathSegment], value: Value) -> std::result::Result<(), String> {
    let Some((head, rest)) = path.split_first() else {
        *node = value;
        return Ok(());
    };

    match head {
        PathSegment::Key(key) => {
            if !node.is_mapping() {
                *node = Value::Mapping(Mapping::new());
            }
            if let Value::Mapping(map) = node {
                if !map.contains_key(key.as_str()) {
                    map.insert(Value::String(key.clone()), Value::Null);
                }
                if let Some(child) = map.get_mut(key.as_str()) {
                    set_path(child, rest, value)?;
                }
            }
        }
        PathSegment::Index(index) => {
            if !node.is_sequence() {
                *node = Value::Sequence(Vec::new());
            }
            if let Value::Sequence(items) = node {
                if *index > items.len() {
                    return Err(format!(
                        "index [{index}] skips over unset elements; the list has {} element(s)",
                        items.len()
                    ));
                }
                if *index == items.len() {
                    items.push(Value::Null);
                }
                set_path(&mut items[*index], rest, value)?;
            }
        }
    }

    Ok(())
}

/// Default values file names to search for.
pub const DEFAULT_VALUES_FILES: &[&str] = &["values.yaml", "values.yml"];

/// Finds a values file in the given directory.
///
/// # Errors
///
/// Returns an error if no values file is found.
pub fn find_values_file(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();

    for filename in DEFAULT_VALUES_FILES {
        let candidate = dir.join(filename);
        if candidate.exists() {
            info!("Found values file: {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(AutoDeployError::Config(ConfigError::FileNotFound {
        path: dir.join(DEFAULT_VALUES_FILES[0]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StrategyType, Track};

    fn values_from_sets(sets: &[&str]) -> ChartValues {
        let sets: Vec<String> = sets.iter().map(|s| (*s).to_string()).collect();
        ValuesParser::new().load_values(&[], &sets, &[]).unwrap()
    }

    #[test]
    fn test_parse_key_with_indices() {
        let path = parse_key("workers.worker1.command[0]").unwrap();
        assert_eq!(
            path,
            vec![
                PathSegment::Key(String::from("workers")),
                PathSegment::Key(String::from("worker1")),
                PathSegment::Key(String::from("command")),
                PathSegment::Index(0),
            ]
        );
    }

    #[test]
    fn test_parse_key_with_escaped_dot() {
        let path = parse_key(r"ingress.annotations.kubernetes\.io/ingress\.class").unwrap();
        assert_eq!(
            path.last(),
            Some(&PathSegment::Key(String::from("kubernetes.io/ingress.class")))
        );
    }

    #[test]
    fn test_typed_scalars() {
        assert_eq!(typed_scalar("true", true), Value::Bool(true));
        assert_eq!(typed_scalar("null", true), Value::Null);
        assert_eq!(typed_scalar("25", true), Value::Number(25.into()));
        assert_eq!(typed_scalar("007", true), Value::String(String::from("007")));
        assert_eq!(typed_scalar("25", false), Value::String(String::from("25")));
    }

    #[test]
    fn test_worker_commands_from_sets() {
        let values = values_from_sets(&[
            "workers.worker1.command[0]=echo",
            "workers.worker1.command[1]=worker1",
            "workers.worker1.strategyType=Recreate",
        ]);

        let worker = &values.workers["worker1"];
        assert_eq!(worker.command, vec!["echo", "worker1"]);
        assert_eq!(worker.strategy_type, Some(StrategyType::Recreate));
    }

    #[test]
    fn test_comma_separated_pairs_and_lists() {
        let values = values_from_sets(&[
            "application.track=canary,ingress.canary.weight=25",
            "service.additionalHosts={a.example.com,b.example.com}",
        ]);

        assert_eq!(values.application.track, Track::Canary);
        assert_eq!(values.ingress.canary.weight, Some(25));
        assert_eq!(values.service.additional_hosts, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn test_null_restores_default() {
        let values = values_from_sets(&["ingress.enabled=null", "service.enabled=true"]);
        assert_eq!(values.ingress.enabled, None);
        assert!(values.ingress_enabled());
    }

    #[test]
    fn test_numeric_string_for_string_key() {
        let values = values_from_sets(&["resources.requests.cpu=500"]);
        assert_eq!(values.resources.requests.cpu.as_deref(), Some("500"));
    }

    #[test]
    fn test_set_string_keeps_strings() {
        let values = ValuesParser::new()
            .load_values(&[], &[], &[String::from("image.tag=1")])
            .unwrap();
        assert_eq!(values.image.tag, "1");
    }

    #[test]
    fn test_bad_type_fails() {
        let sets = vec![String::from("hpa.enabled=sometimes")];
        let result = ValuesParser::new().load_values(&[], &sets, &[]);
        assert!(matches!(
            result,
            Err(AutoDeployError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_bad_strategy_fails() {
        let sets = vec![String::from("strategyType=Sideways")];
        assert!(ValuesParser::new().load_values(&[], &sets, &[]).is_err());
    }

    #[test]
    fn test_missing_value_fails() {
        let mut tree = Value::Mapping(Mapping::new());
        let result = ValuesParser::new().apply_set(&mut tree, "service.enabled");
        assert!(matches!(
            result,
            Err(AutoDeployError::Config(ConfigError::InvalidSetExpression { .. }))
        ));
    }

    #[test]
    fn test_sparse_index_names_expression() {
        let sets = vec![String::from("workers.w.command[1]=echo")];
        let result = ValuesParser::new().load_values(&[], &sets, &[]);
        let Err(AutoDeployError::Config(ConfigError::InvalidSetExpression { expression, reason })) =
            result
        else {
            panic!("expected an invalid set expression");
        };
        assert_eq!(expression, "workers.w.command[1]=echo");
        assert!(reason.contains("[1]"));

        // filling the list in order still works
        let values = values_from_sets(&["workers.w.command[0]=echo", "workers.w.command[1]=hi"]);
        assert_eq!(values.workers["w"].command, vec!["echo", "hi"]);
    }

    #[test]
    fn test_merge_is_deep() {
        let parser = ValuesParser::new();
        let mut base = parser
            .parse_yaml("ingress:\n  tls:\n    enabled: true\n    acme: true\n", None)
            .unwrap();
        let overlay = parser.parse_yaml("ingress:\n  tls:\n    acme: false\n", None).unwrap();
        merge(&mut base, overlay);

        let values = parser.into_values(base).unwrap();
        assert!(values.ingress.tls.enabled);
        assert!(!values.ingress.tls.acme);
    }

    #[test]
    fn test_values_file_then_sets() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("values.yaml");
        std::fs::write(
            &path,
            r#"
ingress:
  modSecurity:
    enabled: true
    secRules:
      - variable: "REQUEST_HEADERS:User-Agent"
        operator: "scanner"
        action: "log,deny,id:107,status:403,msg:'Scanner Identified'"
service:
  url: "http://file.example.com/"
"#,
        )
        .unwrap();

        assert_eq!(find_values_file(dir.path()).unwrap(), path);

        let values = ValuesParser::new()
            .with_base_path(dir.path())
            .load_values(
                &[PathBuf::from("values.yaml")],
                &[String::from("service.url=http://set.example.com/")],
                &[],
            )
            .unwrap();

        assert!(values.ingress.mod_security.enabled);
        assert_eq!(values.ingress.mod_security.sec_rules.len(), 1);
        assert_eq!(values.service.url, "http://set.example.com/");
    }

    #[test]
    fn test_missing_file() {
        let result = ValuesParser::new().load_file("/nonexistent/values.yaml");
        assert!(matches!(
            result,
            Err(AutoDeployError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
