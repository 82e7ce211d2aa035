//! Host value validation
//!
//! Run before any mutating config operation writes a block.

use super::error::ConfigError;
use super::parser::is_pattern;
use super::schema::{HostRecord, REQUEST_TTY_VALUES};

/// Validate a host alias
pub fn validate_host_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation("host name is required".to_string()));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "host name '{name}' cannot contain spaces"
        )));
    }
    if is_pattern(name) || name.contains('#') {
        return Err(ConfigError::Validation(format!(
            "host name '{name}' cannot contain wildcards, '!' or '#'"
        )));
    }
    Ok(())
}

/// Validate a full record before it is written
pub fn validate_host(record: &HostRecord) -> Result<(), ConfigError> {
    validate_host_name(&record.name)?;

    match record.hostname.as_deref() {
        None | Some("") => {
            return Err(ConfigError::Validation(format!(
                "hostname is required for '{}'",
                record.name
            )));
        }
        Some(hostname) if hostname.chars().any(char::is_whitespace) => {
            return Err(ConfigError::Validation(format!(
                "hostname '{hostname}' cannot contain spaces"
            )));
        }
        Some(_) => {}
    }

    if record.port == Some(0) {
        return Err(ConfigError::Validation(
            "port must be between 1 and 65535".to_string(),
        ));
    }

    if let Some(tty) = &record.request_tty {
        if !REQUEST_TTY_VALUES.iter().any(|v| v.eq_ignore_ascii_case(tty)) {
            return Err(ConfigError::Validation(format!(
                "RequestTTY must be one of {}, got '{tty}'",
                REQUEST_TTY_VALUES.join(", ")
            )));
        }
    }

    if record.tags.iter().any(|t| t.contains(',')) {
        return Err(ConfigError::Validation(
            "tags cannot contain commas".to_string(),
        ));
    }

    Ok(())
}

/// Validate the name list of a (possibly multi-host) declaration
///
/// Patterns such as `!bad` may ride along with concrete names, but at least
/// one concrete name is required.
pub fn validate_host_names(names: &[String]) -> Result<(), ConfigError> {
    if !names.iter().any(|n| !is_pattern(n)) {
        return Err(ConfigError::Validation(
            "at least one host name is required".to_string(),
        ));
    }
    for (i, name) in names.iter().enumerate() {
        if is_pattern(name) {
            validate_pattern(name)?;
        } else {
            validate_host_name(name)?;
        }
        if names[..i].contains(name) {
            return Err(ConfigError::Validation(format!(
                "host name '{name}' is listed twice"
            )));
        }
    }
    Ok(())
}

fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    let body = pattern.strip_prefix('!').unwrap_or(pattern);
    if body.is_empty() || pattern.chars().any(|c| c.is_whitespace() || c == '#') {
        return Err(ConfigError::Validation(format!(
            "host pattern '{pattern}' is not valid"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> HostRecord {
        HostRecord::new("web").with_hostname("web.example.com")
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(validate_host(&valid()).is_ok());
        assert!(validate_host(&valid().with_request_tty("Force")).is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_host_name("").is_err());
        assert!(validate_host_name("two words").is_err());
        assert!(validate_host_name("web-*").is_err());
        assert!(validate_host_name("!web").is_err());
        assert!(validate_host_name("web-1.prod").is_ok());
    }

    #[test]
    fn test_hostname_required() {
        let record = HostRecord::new("web");
        assert!(matches!(
            validate_host(&record),
            Err(ConfigError::Validation(_))
        ));
        assert!(validate_host(&record.with_hostname("has space")).is_err());
    }

    #[test]
    fn test_port_and_tty_rules() {
        assert!(validate_host(&valid().with_port(0)).is_err());
        assert!(validate_host(&valid().with_request_tty("sometimes")).is_err());
    }

    #[test]
    fn test_host_names_list() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(validate_host_names(&names(&["a", "b"])).is_ok());
        assert!(validate_host_names(&[]).is_err());
        assert!(validate_host_names(&names(&["a", "a"])).is_err());
    }

    #[test]
    fn test_host_names_keep_patterns_beside_concrete_names() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(validate_host_names(&names(&["web", "!bad"])).is_ok());
        assert!(validate_host_names(&names(&["web", "*.corp"])).is_ok());
        assert!(validate_host_names(&names(&["!bad"])).is_err());
        assert!(validate_host_names(&names(&["web", "!"])).is_err());
        assert!(validate_host_names(&names(&["web", "!bad", "!bad"])).is_err());
    }
}
