//! Committer value type and its roster record format.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static INITIALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("initials pattern compiles"));

/// Reasons a committer cannot be constructed or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitterError {
    #[error("initials must be non-empty and contain only letters, digits, '-' or '_': '{0}'")]
    InvalidInitials(String),
    #[error("committer name must be non-empty and must not contain ',' or control characters")]
    InvalidName,
    #[error("committer email must be non-empty and must not contain control characters")]
    InvalidEmail,
    #[error("malformed committer record: '{0}'")]
    MalformedRecord(String),
}

/// A person who can be credited on a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Committer {
    initials: String,
    name: String,
    email: String,
}

impl Committer {
    pub fn new(
        initials: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, CommitterError> {
        let initials = initials.into().trim().to_string();
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();

        if !INITIALS.is_match(&initials) {
            return Err(CommitterError::InvalidInitials(initials));
        }
        if name.is_empty() || name.contains(',') || has_control(&name) {
            return Err(CommitterError::InvalidName);
        }
        if email.is_empty() || has_control(&email) {
            return Err(CommitterError::InvalidEmail);
        }
        Ok(Self {
            initials,
            name,
            email,
        })
    }

    /// Parse a roster line of the form `initials,name,email`.
    pub fn parse_record(line: &str) -> Result<Self, CommitterError> {
        let mut fields = line.splitn(3, ',');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(initials), Some(name), Some(email)) => Self::new(initials, name, email),
            _ => Err(CommitterError::MalformedRecord(line.to_string())),
        }
    }

    /// Roster line for this committer (no trailing newline).
    pub fn to_record(&self) -> String {
        format!("{},{},{}", self.initials, self.name, self.email)
    }

    pub fn initials(&self) -> &str {
        &self.initials
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Roster records are single lines.
fn has_control(field: &str) -> bool {
    field.chars().any(char::is_control)
}

impl fmt::Display for Committer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roster_record() {
        let committer = Committer::parse_record("ab,Ada Byron,ada@example.com").expect("parse");
        assert_eq!(committer.initials(), "ab");
        assert_eq!(committer.name(), "Ada Byron");
        assert_eq!(committer.email(), "ada@example.com");
        assert_eq!(committer.to_record(), "ab,Ada Byron,ada@example.com");
    }

    #[test]
    fn record_missing_email_is_malformed() {
        let err = Committer::parse_record("ab,Ada Byron").unwrap_err();
        assert_eq!(
            err,
            CommitterError::MalformedRecord("ab,Ada Byron".to_string())
        );
    }

    #[test]
    fn rejects_initials_that_are_not_path_safe() {
        let err = Committer::new("a/b", "Ada", "ada@example.com").unwrap_err();
        assert!(matches!(err, CommitterError::InvalidInitials(_)));
        assert!(Committer::new("", "Ada", "ada@example.com").is_err());
    }

    #[test]
    fn rejects_empty_name_and_email() {
        assert_eq!(
            Committer::new("ab", "  ", "ada@example.com").unwrap_err(),
            CommitterError::InvalidName
        );
        assert_eq!(
            Committer::new("ab", "Ada", "").unwrap_err(),
            CommitterError::InvalidEmail
        );
    }

    #[test]
    fn rejects_line_breaks_and_control_characters() {
        assert_eq!(
            Committer::new("ab", "Ada\nEvil", "ada@example.com").unwrap_err(),
            CommitterError::InvalidName
        );
        assert_eq!(
            Committer::new("ab", "Ada", "ada@example.com\rx").unwrap_err(),
            CommitterError::InvalidEmail
        );
        assert_eq!(
            Committer::new("ab", "Ada\tByron", "ada@example.com").unwrap_err(),
            CommitterError::InvalidName
        );
        assert!(matches!(
            Committer::new("a\u{7}b", "Ada", "ada@example.com").unwrap_err(),
            CommitterError::InvalidInitials(_)
        ));
    }

    #[test]
    fn equality_is_by_value() {
        let a = Committer::new("A", "A", "a@x").expect("committer");
        let b = Committer::new("A", "A", "a@x").expect("committer");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "A <a@x>");
    }
}
