//! Template handling.
//!
//! Loading and compiling templates, reading their parameter declarations and
//! turning `--parameters` arguments into deployment parameters.

mod loader;
mod parameters;
mod parser;

pub use loader::{contains_environment_resource, TemplateLoader, BICEP_ENV_VAR};
pub use parameters::{
    default_value, extract_parameters, inject_application, inject_environment,
    report_missing_parameters, DeclaredParameter, ParameterSet, APPLICATION_PARAMETER,
    ENVIRONMENT_PARAMETER,
};
pub use parser::ParameterParser;
