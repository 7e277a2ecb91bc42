//! `.env.yaml` runtime variables file
//!
//! gcloud reads this file itself; it is validated up front so a typo fails
//! before the first deploy instead of halfway through `--all`.

use crate::error::{ConfigError, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Load and validate a flat `KEY: value` YAML mapping
pub fn load_env_vars_file(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ConfigError::EnvVarsFileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let invalid = |message: String| ConfigError::InvalidEnvVars {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(BTreeMap::new()),
        _ => return Err(invalid("expected a mapping of KEY: value".to_string())),
    };

    let mut vars = BTreeMap::new();
    for (key, value) in mapping {
        let key = match key {
            Value::String(key) => key,
            other => return Err(invalid(format!("non-string key {:?}", other))),
        };
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(invalid(format!(
                    "value of {} must be a scalar, got {:?}",
                    key, other
                )));
            }
        };
        vars.insert(key, value);
    }

    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_flat_mapping() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".env.yaml");
        fs::write(&path, "API_URL: https://example.com\nRETRIES: 3\nDEBUG: false\n").unwrap();

        let vars = load_env_vars_file(&path).unwrap();
        assert_eq!(vars["API_URL"], "https://example.com");
        assert_eq!(vars["RETRIES"], "3");
        assert_eq!(vars["DEBUG"], "false");
    }

    #[test]
    fn test_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_env_vars_file(temp.path().join(".env.yaml")),
            Err(ConfigError::EnvVarsFileNotFound(_))
        ));
    }

    #[test]
    fn test_nested_value_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".env.yaml");
        fs::write(&path, "DB:\n  host: localhost\n").unwrap();

        assert!(matches!(
            load_env_vars_file(&path),
            Err(ConfigError::InvalidEnvVars { .. })
        ));
    }
}
