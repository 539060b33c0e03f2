use std::{fmt, str::FromStr};

use thiserror::Error;

/**
    Error type representing the possible errors that can occur
    when parsing a `Repository`.
*/
#[derive(Debug, Error)]
pub enum RepositoryParseError {
    #[error("repository is empty")]
    Empty,
    #[error("missing '/' separator")]
    MissingSeparator,
    #[error("owner '{0}' is empty or invalid")]
    InvalidOwner(String),
    #[error("name '{0}' is empty or invalid")]
    InvalidName(String),
}

/**
    A GitHub repository, identified by its owner and name.

    Parsed from the `owner/name` form that `GITHUB_REPOSITORY` uses.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn is_invalid_part(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_ascii_whitespace() || c == '/')
}

impl FromStr for Repository {
    type Err = RepositoryParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(RepositoryParseError::Empty);
        }

        let Some((before, after)) = s.split_once('/') else {
            return Err(RepositoryParseError::MissingSeparator);
        };

        let before = before.trim();
        let after = after.trim();

        if is_invalid_part(before) {
            return Err(RepositoryParseError::InvalidOwner(before.to_string()));
        }
        if is_invalid_part(after) {
            return Err(RepositoryParseError::InvalidName(after.to_string()));
        }

        Ok(Self {
            owner: before.to_string(),
            name: after.to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_repo(owner: &str, name: &str) -> Repository {
        Repository {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn parse_valid_basic() {
        // Basic strings should parse ok
        assert!("a/b".parse::<Repository>().is_ok());
        assert!("owner/name".parse::<Repository>().is_ok());
        assert!("123abc456/78de90".parse::<Repository>().is_ok());
        // The parsed Repository should match the input
        assert_eq!("a/b".parse::<Repository>().unwrap(), new_repo("a", "b"));
        assert_eq!(
            "owner/name".parse::<Repository>().unwrap(),
            new_repo("owner", "name")
        );
    }

    #[test]
    fn parse_valid_extra_whitespace() {
        // Leading and trailing whitespace should be trimmed and ok
        let repo = new_repo("a", "b");
        assert_eq!("a/ b".parse::<Repository>().unwrap(), repo);
        assert_eq!("a/b ".parse::<Repository>().unwrap(), repo);
        assert_eq!("a /b".parse::<Repository>().unwrap(), repo);
    }

    #[test]
    fn parse_invalid_missing() {
        // Empty strings or parts should not be allowed
        assert!("".parse::<Repository>().is_err());
        assert!("/".parse::<Repository>().is_err());
        assert!("a/".parse::<Repository>().is_err());
        assert!("/b".parse::<Repository>().is_err());
    }

    #[test]
    fn parse_invalid_extra_separator() {
        // Superfluous separators should not be allowed
        assert!("a/b/".parse::<Repository>().is_err());
        assert!("a/b/c".parse::<Repository>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        assert_eq!(new_repo("owner", "name").to_string(), "owner/name");
    }
}
