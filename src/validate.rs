//! Constraint checking with field-path violation reporting
//!
//! Validation runs before any network call and accumulates every violation in
//! a single pass rather than stopping at the first, so a broken manifest is
//! reported in full. Checks never mutate their input.

use regex::Regex;
use std::sync::LazyLock;

/// Release bundle name/version: leading alphanumeric, then `_.-:` allowed.
pub static BUNDLE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-:]+$").expect("valid bundle name regex")
});

/// Query name: leading alphabetic, then alphanumeric or `_-.:`.
pub static QUERY_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_\-.:]+$").expect("valid query name regex")
});

/// A single constraint violation, attached to the configuration path that
/// caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Accumulated violations from one validation pass. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Violations) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Convert into a `Result`, for the common validate-then-convert flow.
    pub fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}

/// Check a required string is present and non-empty.
pub fn require_non_empty(violations: &mut Violations, path: &str, value: &str) {
    if value.is_empty() {
        violations.push(path, "must not be empty");
    }
}

/// Check a string is one of the allowed values.
pub fn require_one_of(violations: &mut Violations, path: &str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        violations.push(
            path,
            format!("must be one of {:?}, got {:?}", allowed, value),
        );
    }
}

/// Check a string length falls within `min..=max` characters.
pub fn require_length_between(
    violations: &mut Violations,
    path: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        violations.push(
            path,
            format!("must be between {min} and {max} characters, got {len}"),
        );
    }
}

/// Check a string matches the given pattern.
pub fn require_match(
    violations: &mut Violations,
    path: &str,
    value: &str,
    re: &Regex,
    description: &str,
) {
    if !re.is_match(value) {
        violations.push(path, description.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_multiple_violations() {
        let mut v = Violations::new();
        require_non_empty(&mut v, "name", "");
        require_one_of(&mut v, "resource_type", "invalid-type", &["destination"]);
        assert_eq!(v.len(), 2);
        assert!(v.into_result().is_err());
    }

    #[test]
    fn empty_violations_are_ok() {
        let mut v = Violations::new();
        require_non_empty(&mut v, "name", "my-permission");
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn bundle_name_regex() {
        assert!(BUNDLE_NAME_RE.is_match("my-bundle_1.0:rc"));
        assert!(BUNDLE_NAME_RE.is_match("1bundle"));
        assert!(!BUNDLE_NAME_RE.is_match("-leading-dash"));
        assert!(!BUNDLE_NAME_RE.is_match("a"));
        assert!(!BUNDLE_NAME_RE.is_match("has space"));
    }

    #[test]
    fn query_name_regex() {
        assert!(QUERY_NAME_RE.is_match("query-1"));
        assert!(!QUERY_NAME_RE.is_match("1invalid"));
        assert!(!QUERY_NAME_RE.is_match("i"));
    }

    #[test]
    fn violation_display_includes_path() {
        let mut v = Violations::new();
        v.push("principals.users", "at least one user or group required");
        assert!(v.to_string().contains("principals.users"));
    }
}
