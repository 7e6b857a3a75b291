//! Template loading.
//!
//! JSON templates are read directly. Bicep files are compiled to ARM JSON by
//! an external compiler invoked as `<compiler> build <file> --stdout`.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Result, TemplateError};

/// Environment variable overriding the Bicep compiler location.
pub const BICEP_ENV_VAR: &str = "RAD_BICEP";

/// Compiler name looked up on `PATH` when nothing else is configured.
const DEFAULT_BICEP_COMMAND: &str = "bicep";

/// Resource types that create an environment.
const ENVIRONMENT_TYPES: [&str; 2] = ["Applications.Core/environments", "Radius.Core/environments"];

/// Loads deployment templates.
#[derive(Debug, Default, Clone)]
pub struct TemplateLoader {
    /// Explicit compiler path; resolved lazily when `None`.
    bicep: Option<PathBuf>,
}

impl TemplateLoader {
    /// Creates a loader that locates the Bicep compiler on demand.
    #[must_use]
    pub const fn new() -> Self {
        Self { bicep: None }
    }

    /// Uses the given compiler instead of looking one up.
    #[must_use]
    pub fn with_bicep(mut self, path: impl Into<PathBuf>) -> Self {
        self.bicep = Some(path.into());
        self
    }

    /// Reads or compiles a template into its JSON object form.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, the compiler fails, or the
    /// result is not a JSON object.
    pub async fn prepare(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        info!("Preparing template {}", path.display());

        if !path.exists() {
            return Err(TemplateError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let content = if is_json {
            tokio::fs::read_to_string(path).await?
        } else {
            self.compile(path).await?
        };

        parse_template(path, &content)
    }

    /// Runs the Bicep compiler and returns its stdout.
    async fn compile(&self, path: &Path) -> Result<String> {
        let compiler = self.bicep.clone().unwrap_or_else(locate_bicep);
        debug!("Compiling {} with {}", path.display(), compiler.display());

        let output = Command::new(&compiler)
            .arg("build")
            .arg(path)
            .arg("--stdout")
            .output()
            .await
            .map_err(|e| TemplateError::CompileFailed {
                path: path.to_path_buf(),
                stderr: format!("failed to run {}: {e}", compiler.display()),
            })?;

        if !output.status.success() {
            return Err(TemplateError::CompileFailed {
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Finds the Bicep compiler: `RAD_BICEP`, then `~/.rad/bin/rad-bicep`,
/// then `bicep` on `PATH`.
fn locate_bicep() -> PathBuf {
    if let Ok(path) = std::env::var(BICEP_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let installed = home.join(".rad").join("bin").join("rad-bicep");
        if installed.exists() {
            return installed;
        }
    }

    PathBuf::from(DEFAULT_BICEP_COMMAND)
}

fn parse_template(path: &Path, content: &str) -> Result<Value> {
    let template: Value = serde_json::from_str(content).map_err(|e| TemplateError::InvalidTemplate {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !template.is_object() {
        return Err(TemplateError::InvalidTemplate {
            path: path.to_path_buf(),
            message: String::from("expected a JSON object"),
        }
        .into());
    }

    Ok(template)
}

/// Returns true if the template declares an environment resource.
///
/// Handles both the classic `resources` array and the symbolic-name object
/// form. Types may carry an `@<api-version>` suffix.
#[must_use]
pub fn contains_environment_resource(template: &Value) -> bool {
    let Some(resources) = template.get("resources") else {
        return false;
    };

    let mut entries: Box<dyn Iterator<Item = &Value>> = match resources {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(items) => Box::new(items.values()),
        _ => return false,
    };

    entries.any(|resource| {
        resource
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(is_environment_type)
    })
}

fn is_environment_type(resource_type: &str) -> bool {
    let base = resource_type
        .split_once('@')
        .map_or(resource_type, |(base, _)| base);

    ENVIRONMENT_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_json_template() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("app.json");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(br#"{"parameters":{"environment":{}},"resources":[]}"#)
            .expect("write");

        let template = TemplateLoader::new().prepare(&path).await.expect("template");

        assert!(template["parameters"].get("environment").is_some());
    }

    #[tokio::test]
    async fn test_prepare_missing_file() {
        let result = TemplateLoader::new().prepare("/does/not/exist.bicep").await;

        assert!(matches!(
            result,
            Err(crate::error::RadError::Template(TemplateError::FileNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_prepare_rejects_non_object() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("app.json");
        std::fs::write(&path, "[1, 2, 3]").expect("write");

        let result = TemplateLoader::new().prepare(&path).await;

        assert!(matches!(
            result,
            Err(crate::error::RadError::Template(TemplateError::InvalidTemplate { .. }))
        ));
    }

    #[tokio::test]
    async fn test_compiler_not_found() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("app.bicep");
        std::fs::write(&path, "param environment string").expect("write");

        let result = TemplateLoader::new()
            .with_bicep(dir.path().join("no-such-compiler"))
            .prepare(&path)
            .await;

        assert!(matches!(
            result,
            Err(crate::error::RadError::Template(TemplateError::CompileFailed { .. }))
        ));
    }

    #[test]
    fn test_contains_environment_resource() {
        let classic = json!({
            "resources": [
                { "type": "Applications.Core/containers", "name": "web" },
                { "type": "Applications.Core/environments", "name": "env" }
            ]
        });
        let symbolic = json!({
            "resources": {
                "env": { "type": "Radius.Core/environments@2025-08-01-preview" }
            }
        });

        assert!(contains_environment_resource(&classic));
        assert!(contains_environment_resource(&symbolic));
    }

    #[test]
    fn test_no_environment_resource() {
        let template = json!({
            "resources": {
                "app": { "type": "Applications.Core/applications@2023-10-01-preview" },
                "other": { "type": "Applications.Core/environmentsExtra" }
            }
        });

        assert!(!contains_environment_resource(&template));
        assert!(!contains_environment_resource(&json!({})));
    }
}
