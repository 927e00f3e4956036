//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Only braced references are expanded. Bare `$VAR`, an unclosed `${` and
/// text produced by an expansion are copied through unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len + 1;
        output.push_str(&rest[..start]);
        output.push_str(&expand_reference(&rest[start..end], field)?);
        rest = &rest[end..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Expand a single `${...}` reference.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    let inner = &reference[2..reference.len() - 1];
    let (var_name, default) = match inner.split_once(":-") {
        Some((var_name, default)) => (var_name, Some(default)),
        None => (inner, None),
    };

    if default.is_none() && std::env::var(var_name).is_err() {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var_name}}} not set"),
        });
    }

    let expanded =
        shellexpand::env_with_context_no_errors(reference, |var| std::env::var(var).ok());
    Ok(expanded.into_owned())
}
