//! Scalar coercion helpers for values deserialization.
//!
//! Values arrive either typed (YAML files, inferred `--set` scalars) or as
//! strings (`--set-string`, quoted YAML). Every key has a declared type and
//! these helpers accept any scalar that coerces to it.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a map",
        Value::Tagged(_) => "a tagged value",
    }
}

fn to_bool<E: serde::de::Error>(value: &Value) -> Result<bool, E> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(E::custom(format!("expected a boolean, found \"{other}\""))),
        },
        other => Err(E::custom(format!("expected a boolean, found {}", describe(other)))),
    }
}

fn to_u32<E: serde::de::Error>(value: &Value) -> Result<u32, E> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| E::custom(format!("expected a non-negative integer, found {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| E::custom(format!("expected a non-negative integer, found \"{s}\""))),
        other => Err(E::custom(format!(
            "expected a non-negative integer, found {}",
            describe(other)
        ))),
    }
}

/// Deserializes any scalar as a string.
pub fn string_like<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a string, found {}", describe(&value))))
}

/// Deserializes an optional scalar as a string.
pub fn opt_string_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => scalar_to_string(&v)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a string, found {}", describe(&v)))),
    }
}

/// Deserializes a boolean from a boolean or `"true"`/`"false"`.
pub fn bool_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_bool(&value)
}

/// Deserializes an optional boolean; null means unset.
pub fn opt_bool_like<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => to_bool(&v).map(Some),
    }
}

/// Deserializes a non-negative integer from a number or numeric string.
pub fn u32_like<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_u32(&value)
}

/// Deserializes an optional non-negative integer; null means unset.
pub fn opt_u32_like<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => to_u32(&v).map(Some),
    }
}

/// Deserializes an optional scalar and parses it with [`FromStr`].
///
/// Null and the empty string both mean unset.
pub fn opt_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match opt_string_like(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse().map(Some).map_err(D::Error::custom),
    }
}

/// Deserializes a list of scalars as strings.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            scalar_to_string(v).ok_or_else(|| {
                D::Error::custom(format!("[{i}]: expected a string, found {}", describe(v)))
            })
        })
        .collect()
}

/// Deserializes a string-keyed map whose values are any scalar.
///
/// Entries with a null value are dropped.
pub fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut out = BTreeMap::new();
    for (key, value) in values {
        if value.is_null() {
            continue;
        }
        let text = scalar_to_string(&value).ok_or_else(|| {
            D::Error::custom(format!("{key}: expected a string, found {}", describe(&value)))
        })?;
        out.insert(key, text);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "bool_like")]
        flag: bool,
        #[serde(default, deserialize_with = "opt_u32_like")]
        weight: Option<u32>,
        #[serde(default, deserialize_with = "string_like")]
        cpu: String,
        #[serde(default, deserialize_with = "string_list")]
        command: Vec<String>,
    }

    #[test]
    fn test_coerces_strings_and_numbers() {
        let sample: Sample = serde_yaml::from_str(
            "flag: \"true\"\nweight: \"25\"\ncpu: 500\ncommand: [echo, 1]\n",
        )
        .unwrap();
        assert!(sample.flag);
        assert_eq!(sample.weight, Some(25));
        assert_eq!(sample.cpu, "500");
        assert_eq!(sample.command, vec!["echo", "1"]);
    }

    #[test]
    fn test_rejects_bad_boolean() {
        let result: Result<Sample, _> = serde_yaml::from_str("flag: maybe\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_negative_integer() {
        let result: Result<Sample, _> = serde_yaml::from_str("weight: -3\n");
        assert!(result.is_err());
    }
}
