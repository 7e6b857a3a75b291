//! Parsing of `--parameters` arguments.
//!
//! Three forms are accepted:
//!
//! - `@file.json`: a parameter file, either a full ARM parameter file with a
//!   `parameters` object or a bare object of wrappers
//! - `name=@file.json`: a single parameter whose value is the JSON document
//!   in the file
//! - `name=value`: a single string parameter
//!
//! Arguments are applied in order, later ones overriding earlier ones.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, TemplateError};

use super::parameters::ParameterSet;

/// Parser for `--parameters` arguments.
#[derive(Debug, Default)]
pub struct ParameterParser;

impl ParameterParser {
    /// Creates a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses every argument into a single parameter set.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is malformed or a referenced file
    /// cannot be read or parsed.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParameterSet> {
        let mut parameters = ParameterSet::new();

        for arg in args {
            let arg = arg.as_ref();

            if let Some(file) = arg.strip_prefix('@') {
                parameters.merge(Self::parse_file(arg, Path::new(file))?);
                continue;
            }

            let Some((name, value)) = arg.split_once('=') else {
                return Err(invalid(arg, "expected name=value, name=@file or @file"));
            };
            if name.is_empty() {
                return Err(invalid(arg, "parameter name is empty"));
            }

            if let Some(file) = value.strip_prefix('@') {
                let document = read_json(arg, Path::new(file))?;
                parameters.set_value(name, document);
            } else {
                parameters.set_value(name, value);
            }
        }

        debug!("Parsed {} parameter(s)", parameters.len());
        Ok(parameters)
    }

    /// Reads a parameter file.
    fn parse_file(arg: &str, path: &Path) -> Result<ParameterSet> {
        let document = read_json(arg, path)?;

        // full parameter files nest the values under `parameters`
        let entries = match document.get("parameters") {
            Some(nested) => nested.clone(),
            None => document,
        };

        let Value::Object(entries) = entries else {
            return Err(invalid(arg, "parameter file must contain an object"));
        };

        let mut parameters = ParameterSet::new();
        for (name, wrapper) in entries {
            if !wrapper.is_object() {
                return Err(invalid(
                    arg,
                    &format!("parameter '{name}' must be an object with a 'value' or 'reference'"),
                ));
            }
            parameters.insert(name, wrapper);
        }

        Ok(parameters)
    }
}

fn read_json(arg: &str, path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| invalid(arg, &format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&content)
        .map_err(|e| invalid(arg, &format!("{} is not valid JSON: {e}", path.display())))
}

fn invalid(arg: &str, message: &str) -> crate::error::RadError {
    TemplateError::InvalidParameter {
        arg: arg.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(content: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.to_string().as_bytes())
            .expect("write temp file");
        file
    }

    #[test]
    fn test_parse_name_value() {
        let parameters = ParameterParser::new()
            .parse(&["a=one", "b=two=2", "c="])
            .expect("valid arguments");

        assert_eq!(parameters.get("a"), Some(&json!({ "value": "one" })));
        assert_eq!(parameters.get("b"), Some(&json!({ "value": "two=2" })));
        assert_eq!(parameters.get("c"), Some(&json!({ "value": "" })));
    }

    #[test]
    fn test_parse_parameter_file() {
        let file = json_file(&json!({
            "$schema": "https://schema.management.azure.com/schemas/2019-04-01/deploymentParameters.json#",
            "parameters": {
                "image": { "value": "nginx" },
                "replicas": { "value": 3 }
            }
        }));
        let arg = format!("@{}", file.path().display());

        let parameters = ParameterParser::new().parse(&[arg]).expect("valid file");

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.get("replicas"), Some(&json!({ "value": 3 })));
    }

    #[test]
    fn test_parse_value_from_file() {
        let file = json_file(&json!({ "tier": "gold", "zones": [1, 2] }));
        let arg = format!("settings=@{}", file.path().display());

        let parameters = ParameterParser::new().parse(&[arg]).expect("valid file");

        assert_eq!(
            parameters.get("settings"),
            Some(&json!({ "value": { "tier": "gold", "zones": [1, 2] } }))
        );
    }

    #[test]
    fn test_later_arguments_override() {
        let file = json_file(&json!({ "image": { "value": "nginx" } }));
        let args = [format!("@{}", file.path().display()), String::from("image=redis")];

        let parameters = ParameterParser::new().parse(&args).expect("valid arguments");

        assert_eq!(parameters.get("image"), Some(&json!({ "value": "redis" })));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let parser = ParameterParser::new();

        assert!(parser.parse(&["novalue"]).is_err());
        assert!(parser.parse(&["=value"]).is_err());
        assert!(parser.parse(&["@/does/not/exist.json"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bare_values_in_file() {
        let file = json_file(&json!({ "image": "nginx" }));
        let arg = format!("@{}", file.path().display());

        assert!(ParameterParser::new().parse(&[arg]).is_err());
    }
}
