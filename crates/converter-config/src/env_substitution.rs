use converter_core::{ConverterError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::env;

// ${VAR} or ${VAR:-default}
static ENV_VAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}").expect("Invalid regex pattern")
});

/// Recursively substitute environment variables in every string of a
/// configuration tree.
pub fn substitute_env_vars(value: &mut Value) -> Result<()> {
    match value {
        Value::String(s) => {
            *s = substitute_in_string(s)?;
        }
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                substitute_env_vars(v)?;
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                substitute_env_vars(v)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn substitute_in_string(input: &str) -> Result<String> {
    let mut missing_vars = Vec::new();

    let result = ENV_VAR_REGEX.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_name = &cap[1];
        match env::var(var_name) {
            Ok(value) => value,
            Err(_) => match cap.get(2) {
                Some(default) => default.as_str().to_string(),
                None if var_name == "HOME" => home_fallback().unwrap_or_else(|| {
                    missing_vars.push(var_name.to_string());
                    String::new()
                }),
                None => {
                    missing_vars.push(var_name.to_string());
                    String::new()
                }
            },
        }
    });

    if !missing_vars.is_empty() {
        return Err(ConverterError::ConfigError(format!(
            "Missing required environment variables: {}. Please set these variables before loading the configuration.",
            missing_vars.join(", ")
        )));
    }

    Ok(result.into_owned())
}

fn home_fallback() -> Option<String> {
    env::var("USERPROFILE")
        .ok()
        .or_else(|| dirs::home_dir().map(|p| p.to_string_lossy().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitute_env_vars() {
        env::set_var("CONVERTER_TEST_DIR", "/srv/converter");

        let mut value = json!({
            "path": "${CONVERTER_TEST_DIR}/history.db",
            "default": "${CONVERTER_TEST_UNSET:-fallback}",
            "nested": {
                "list": ["${CONVERTER_TEST_DIR}", 42]
            }
        });

        substitute_env_vars(&mut value).unwrap();

        assert_eq!(value["path"], "/srv/converter/history.db");
        assert_eq!(value["default"], "fallback");
        assert_eq!(value["nested"]["list"][0], "/srv/converter");
        assert_eq!(value["nested"]["list"][1], 42);

        env::remove_var("CONVERTER_TEST_DIR");
    }

    #[test]
    fn test_missing_variable_is_reported() {
        let mut value = json!({ "url": "${CONVERTER_TEST_NEVER_SET}/latest" });
        let err = substitute_env_vars(&mut value).unwrap_err();
        assert!(err.to_string().contains("CONVERTER_TEST_NEVER_SET"));
    }
}
