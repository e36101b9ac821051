//! Typed extraction of named tool arguments.
//!
//! MCP clients send tool arguments as a loose JSON object. These helpers pull a
//! single named value out of it and check its JSON type, producing the messages
//! returned to the caller as error tool results.

use rmcp::model::JsonObject;
use serde_json::Value;
use thiserror::Error;

/// A tool argument that is missing or has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing required parameter: {0}")]
    Missing(String),

    #[error("parameter {name} is not of type {expected}, is {actual}")]
    WrongType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("parameter {0} must be an integer")]
    NotInteger(String),

    #[error("parameter {0} is not of type []string")]
    NotStringArray(String),
}

/// Scalar JSON types a tool argument can be read as.
pub trait ParamValue: Sized + Default + PartialEq {
    /// Name used in type-mismatch messages.
    const TYPE_NAME: &'static str;

    fn from_json(value: &Value) -> Option<Self>;
}

impl ParamValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl ParamValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ParamValue for f64 {
    const TYPE_NAME: &'static str = "number";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn typed<T: ParamValue>(name: &str, value: &Value) -> Result<T, ParamError> {
    T::from_json(value).ok_or_else(|| ParamError::WrongType {
        name: name.to_string(),
        expected: T::TYPE_NAME,
        actual: json_type_name(value),
    })
}

/// A parameter that must be present, of type `T`, and not `T`'s zero value.
pub fn required_param<T: ParamValue>(args: &JsonObject, name: &str) -> Result<T, ParamError> {
    let value = args
        .get(name)
        .ok_or_else(|| ParamError::Missing(name.to_string()))?;
    let value: T = typed(name, value)?;
    if value == T::default() {
        return Err(ParamError::Missing(name.to_string()));
    }
    Ok(value)
}

/// A parameter that may be absent (zero value), but must be of type `T` when present.
pub fn optional_param<T: ParamValue>(args: &JsonObject, name: &str) -> Result<T, ParamError> {
    optional_param_ok(args, name).map(|(value, _)| value)
}

/// Like [`optional_param`], also reporting whether the parameter was present.
pub fn optional_param_ok<T: ParamValue>(
    args: &JsonObject,
    name: &str,
) -> Result<(T, bool), ParamError> {
    match args.get(name) {
        Some(value) => Ok((typed(name, value)?, true)),
        None => Ok((T::default(), false)),
    }
}

fn as_integer(name: &str, number: f64) -> Result<i64, ParamError> {
    if number.fract() != 0.0 || !number.is_finite() {
        return Err(ParamError::NotInteger(name.to_string()));
    }
    Ok(number as i64)
}

/// A whole-number parameter that must be present. Zero is accepted.
pub fn required_int(args: &JsonObject, name: &str) -> Result<i64, ParamError> {
    let value = args
        .get(name)
        .ok_or_else(|| ParamError::Missing(name.to_string()))?;
    as_integer(name, typed(name, value)?)
}

/// An optional whole-number parameter; `0` when absent.
pub fn optional_int_param(args: &JsonObject, name: &str) -> Result<i64, ParamError> {
    optional_int_param_with_default(args, name, 0)
}

pub fn optional_int_param_with_default(
    args: &JsonObject,
    name: &str,
    default: i64,
) -> Result<i64, ParamError> {
    match optional_param_ok::<f64>(args, name)? {
        (number, true) => as_integer(name, number),
        (_, false) => Ok(default),
    }
}

/// An optional array of strings; empty when absent.
pub fn optional_string_array_param(
    args: &JsonObject,
    name: &str,
) -> Result<Vec<String>, ParamError> {
    match args.get(name) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ParamError::NotStringArray(name.to_string()))
            })
            .collect(),
        Some(_) => Err(ParamError::NotStringArray(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_required_param_present() {
        let a = args(json!({"namespace": "default", "previous": true, "n": 3}));
        assert_eq!(required_param::<String>(&a, "namespace").unwrap(), "default");
        assert!(required_param::<bool>(&a, "previous").unwrap());
        assert_eq!(required_param::<f64>(&a, "n").unwrap(), 3.0);
    }

    #[test]
    fn test_required_param_missing_and_zero_value() {
        let a = args(json!({"name": "", "flag": false}));
        let missing = required_param::<String>(&a, "namespace").unwrap_err();
        assert_eq!(missing.to_string(), "missing required parameter: namespace");

        let empty = required_param::<String>(&a, "name").unwrap_err();
        assert_eq!(empty, ParamError::Missing("name".to_string()));

        let falsy = required_param::<bool>(&a, "flag").unwrap_err();
        assert_eq!(falsy, ParamError::Missing("flag".to_string()));
    }

    #[test]
    fn test_wrong_type_message() {
        let a = args(json!({"myParam": true, "other": "yes"}));
        let err = required_param::<String>(&a, "myParam").unwrap_err();
        assert_eq!(err.to_string(), "parameter myParam is not of type string, is bool");

        let err = optional_param::<bool>(&a, "other").unwrap_err();
        assert_eq!(err.to_string(), "parameter other is not of type bool, is string");
    }

    #[test]
    fn test_optional_param_ok_reports_presence() {
        let a = args(json!({"myParam": "hello", "count": 123}));
        assert_eq!(
            optional_param_ok::<String>(&a, "myParam").unwrap(),
            ("hello".to_string(), true)
        );
        assert_eq!(optional_param_ok::<f64>(&a, "count").unwrap(), (123.0, true));
        assert_eq!(
            optional_param_ok::<String>(&a, "absent").unwrap(),
            (String::new(), false)
        );
    }

    #[test]
    fn test_integer_params() {
        let a = args(json!({"replicas": 0, "tail": 2.5, "grace": 30}));
        assert_eq!(required_int(&a, "replicas").unwrap(), 0);
        assert_eq!(
            optional_int_param(&a, "tail").unwrap_err().to_string(),
            "parameter tail must be an integer"
        );
        assert_eq!(optional_int_param(&a, "grace").unwrap(), 30);
        assert_eq!(optional_int_param(&a, "absent").unwrap(), 0);
        assert_eq!(optional_int_param_with_default(&a, "absent", 7).unwrap(), 7);
        assert!(matches!(
            required_int(&a, "absent"),
            Err(ParamError::Missing(_))
        ));
    }

    #[test]
    fn test_string_array_param() {
        let a = args(json!({"names": ["a", "b"], "mixed": ["a", 1], "scalar": "a"}));
        assert_eq!(optional_string_array_param(&a, "names").unwrap(), vec!["a", "b"]);
        assert!(optional_string_array_param(&a, "absent").unwrap().is_empty());
        assert_eq!(
            optional_string_array_param(&a, "mixed").unwrap_err().to_string(),
            "parameter mixed is not of type []string"
        );
        assert!(optional_string_array_param(&a, "scalar").is_err());
    }
}
