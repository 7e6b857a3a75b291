//! Template parameters: what a template declares and what the user supplied.
//!
//! Supplied values are kept in ARM parameter-file shape, one wrapper object
//! per name (`{"value": ...}` or `{"reference": ...}`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{DeployError, Result, TemplateError};

/// Parameter that receives the resolved environment ID.
pub const ENVIRONMENT_PARAMETER: &str = "environment";

/// Parameter that receives the computed application ID.
pub const APPLICATION_PARAMETER: &str = "application";

/// Key of the parameter declarations in a template.
const PARAMETERS_SECTION: &str = "parameters";

/// Key marking a declared default.
const DEFAULT_VALUE_KEY: &str = "defaultValue";

/// A parameter declared by a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredParameter {
    /// Parameter name as declared.
    pub name: String,
    /// Whether the declaration carries a default value.
    pub has_default: bool,
}

/// Parameter values supplied for a deployment.
///
/// Keys are case-sensitive; [`ParameterSet::contains_ignore_case`] is the
/// lookup used to decide whether a declared parameter was supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, Value>);

impl ParameterSet {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a raw wrapper object, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, wrapper: Value) {
        self.0.insert(name.into(), wrapper);
    }

    /// Sets a plain value, wrapped as `{"value": value}`.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let mut wrapper = Map::new();
        wrapper.insert(String::from("value"), value.into());
        self.0.insert(name.into(), Value::Object(wrapper));
    }

    /// Returns the wrapper stored under exactly `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns true if a value was supplied under any casing of `name`.
    #[must_use]
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.0.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Copies every entry of `other` into this set; `other` wins on conflicts.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over names and wrappers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<const N: usize> From<[(&str, Value); N]> for ParameterSet {
    fn from(entries: [(&str, Value); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

/// Reads the parameter declarations of a template, sorted by name.
///
/// A template without a `parameters` section declares nothing.
///
/// # Errors
///
/// Returns an error if `parameters` is not an object.
pub fn extract_parameters(template: &Value) -> Result<Vec<DeclaredParameter>> {
    let Some(section) = template.get(PARAMETERS_SECTION) else {
        return Ok(Vec::new());
    };

    let declarations = section.as_object().ok_or_else(|| TemplateError::MalformedSection {
        section: String::from(PARAMETERS_SECTION),
        message: String::from("expected an object of parameter declarations"),
    })?;

    let mut declared: Vec<DeclaredParameter> = declarations
        .iter()
        .map(|(name, declaration)| DeclaredParameter {
            name: name.clone(),
            has_default: default_value(declaration).is_some(),
        })
        .collect();
    declared.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(declared)
}

/// Returns the default value of a parameter declaration, if any.
#[must_use]
pub fn default_value(declaration: &Value) -> Option<&Value> {
    declaration.get(DEFAULT_VALUE_KEY)
}

/// Returns true if the template declares a parameter named exactly `name`.
fn declares(template: &Value, name: &str) -> bool {
    template
        .get(PARAMETERS_SECTION)
        .and_then(Value::as_object)
        .is_some_and(|p| p.contains_key(name))
}

/// Writes the environment ID under `environment` if the template declares it.
pub fn inject_environment(template: &Value, parameters: &mut ParameterSet, environment_id: &str) {
    inject(template, parameters, ENVIRONMENT_PARAMETER, environment_id);
}

/// Writes the application ID under `application` if the template declares it.
pub fn inject_application(template: &Value, parameters: &mut ParameterSet, application_id: &str) {
    inject(template, parameters, APPLICATION_PARAMETER, application_id);
}

fn inject(template: &Value, parameters: &mut ParameterSet, name: &str, value: &str) {
    if declares(template, name) {
        debug!("Injecting parameter {name}");
        parameters.set_value(name, value);
    }
}

/// Checks every declared parameter against the supplied values.
///
/// A declared parameter is satisfied when a value was supplied under any
/// casing of its name or when it has a default. Unsatisfied parameters are
/// reported together, one line each, sorted by name.
///
/// # Errors
///
/// Returns [`DeployError::MissingParameters`] listing every unmet parameter,
/// or a template error if the declarations cannot be read.
pub fn report_missing_parameters(file: &str, template: &Value, supplied: &ParameterSet) -> Result<()> {
    let mut messages = BTreeMap::new();

    for parameter in extract_parameters(template)? {
        if supplied.contains_ignore_case(&parameter.name) || parameter.has_default {
            continue;
        }

        messages.insert(parameter.name.clone(), missing_message(&parameter.name));
    }

    if messages.is_empty() {
        return Ok(());
    }

    let details = messages
        .values()
        .map(|m| format!("  - {m}"))
        .collect::<Vec<_>>()
        .join("\n");

    Err(DeployError::MissingParameters {
        file: file.to_string(),
        details,
    }
    .into())
}

fn missing_message(parameter: &str) -> String {
    if parameter.eq_ignore_ascii_case(ENVIRONMENT_PARAMETER) {
        String::from("The template requires an environment. Use --environment to specify the environment name.")
    } else if parameter.eq_ignore_ascii_case(APPLICATION_PARAMETER) {
        String::from("The template requires an application. Use --application to specify the application name.")
    } else {
        format!(
            "The template requires a parameter \"{parameter}\". Use --parameters {parameter}=<value> to specify the value."
        )
    }
}
