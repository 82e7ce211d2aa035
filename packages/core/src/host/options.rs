//! Conversion between config option lines and `-o Key=Value` text
//!
//! Editing front-ends show unrecognized config keys the way they would be
//! passed to `ssh` on the command line.

use super::error::ConfigError;
use super::schema::SshOption;

/// Format options as command-line flags, e.g. `-o ServerAliveInterval=30`
pub fn format_ssh_options(options: &[SshOption]) -> String {
    options
        .iter()
        .map(|opt| format!("-o {}={}", opt.key, opt.value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse `-o Key=Value` style text back into options
///
/// Accepts `-o Key=Value`, `-oKey=Value` and bare `Key=Value` tokens. Tokens
/// without `=` that follow an option are appended to its value, so values
/// containing spaces (e.g. `ProxyCommand`) survive.
pub fn parse_ssh_options(text: &str) -> Result<Vec<SshOption>, ConfigError> {
    let mut raw: Vec<String> = Vec::new();
    let mut expect_value = false;

    for token in text.split_whitespace() {
        if token == "-o" {
            expect_value = true;
            continue;
        }
        if expect_value {
            raw.push(token.to_string());
            expect_value = false;
        } else if let Some(rest) = token.strip_prefix("-o") {
            raw.push(rest.to_string());
        } else if token.contains('=') || raw.is_empty() {
            raw.push(token.to_string());
        } else if let Some(last) = raw.last_mut() {
            last.push(' ');
            last.push_str(token);
        }
    }

    if expect_value {
        return Err(ConfigError::Validation(
            "'-o' must be followed by Key=Value".to_string(),
        ));
    }

    raw.into_iter()
        .map(|entry| {
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                ConfigError::Validation(format!("Option '{entry}' must be in Key=Value form"))
            })?;
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Option '{entry}' must be in Key=Value form"
                )));
            }
            Ok(SshOption::new(key, value))
        })
        .collect()
}
