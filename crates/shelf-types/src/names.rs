//! Container name validation.
//!
//! Valid container names:
//! - Must be non-empty
//! - Must not contain path separators (`/`, `\`) or NUL
//! - Must not be `.` or `..`, and must not contain a `..` traversal
//! - Must not start or end with whitespace

use crate::error::{ContainerError, Result};

/// Characters that are forbidden anywhere in a container name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate a container name, returning `Ok(())` if valid.
///
/// A name that passes validation maps to exactly one directory under its
/// parent, so container resolution never fails after this check.
///
/// # Examples
///
/// ```
/// use shelf_types::validate_container_name;
///
/// assert!(validate_container_name("Photos").is_ok());
/// assert!(validate_container_name("72 Heol Llinos").is_ok());
/// assert!(validate_container_name("").is_err());
/// assert!(validate_container_name("a/b").is_err());
/// ```
pub fn validate_container_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ContainerError::InvalidName {
            name: name.to_string(),
            reason: "container name must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(ContainerError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    // `.` and `..` name the parent hierarchy, not a container.
    if name == "." || name == ".." {
        return Err(ContainerError::InvalidName {
            name: name.to_string(),
            reason: "must not be '.' or '..'".into(),
        });
    }

    // Must not contain `..` (parent traversal).
    if name.contains("..") {
        return Err(ContainerError::InvalidName {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }

    if name.starts_with(char::is_whitespace) || name.ends_with(char::is_whitespace) {
        return Err(ContainerError::InvalidName {
            name: name.to_string(),
            reason: "must not start or end with whitespace".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_simple_names() {
        assert!(validate_container_name("Photos").is_ok());
        assert!(validate_container_name("records.json").is_ok());
        assert!(validate_container_name("72 Heol Llinos").is_ok());
        assert!(validate_container_name("v1.0").is_ok());
    }

    #[test]
    fn reject_empty_name() {
        assert!(validate_container_name("").is_err());
    }

    #[test]
    fn reject_separators() {
        assert!(validate_container_name("a/b").is_err());
        assert!(validate_container_name("a\\b").is_err());
        assert!(validate_container_name("a\0b").is_err());
    }

    #[test]
    fn reject_traversal() {
        assert!(validate_container_name(".").is_err());
        assert!(validate_container_name("..").is_err());
        assert!(validate_container_name("a..b").is_err());
    }

    #[test]
    fn reject_whitespace_boundaries() {
        assert!(validate_container_name(" padded").is_err());
        assert!(validate_container_name("padded ").is_err());
        assert!(validate_container_name("pad ded").is_ok());
    }
}
