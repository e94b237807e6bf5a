// src/recipe/requirement.rs

//! Declared upstream dependencies
//!
//! A requirement is written as `Name/Version@user/channel`, where the
//! `@user/channel` part is optional. The runner only records requirements;
//! resolving them is the host's job.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reference to an upstream package the recipe builds against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Requirement {
    pub name: String,
    pub version: String,
    pub user: Option<String>,
    pub channel: Option<String>,
}

impl Requirement {
    /// Parse a reference string
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = |why: &str| {
            Error::ParseError(format!("Invalid requirement '{}': {}", reference, why))
        };

        let (coordinates, origin) = match reference.trim().split_once('@') {
            Some((left, right)) => (left, Some(right)),
            None => (reference.trim(), None),
        };

        let (name, version) = coordinates
            .split_once('/')
            .ok_or_else(|| invalid("expected Name/Version"))?;
        if !is_valid_part(name) || !is_valid_part(version) {
            return Err(invalid("name and version must be non-empty words"));
        }

        let (user, channel) = match origin {
            Some(origin) => {
                let (user, channel) = origin
                    .split_once('/')
                    .ok_or_else(|| invalid("expected @user/channel"))?;
                if !is_valid_part(user) || !is_valid_part(channel) {
                    return Err(invalid("user and channel must be non-empty words"));
                }
                (Some(user.to_string()), Some(channel.to_string()))
            }
            None => (None, None),
        };

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            user,
            channel,
        })
    }

    /// Upper-cased name used in generated CMake variables
    pub fn cmake_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect()
    }
}

fn is_valid_part(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            write!(f, "@{}/{}", user, channel)?;
        }
        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Requirement {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Requirement> for String {
    fn from(value: Requirement) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reference() {
        let req = Requirement::parse("Boost/1.60.0@lasote/stable").unwrap();
        assert_eq!(req.name, "Boost");
        assert_eq!(req.version, "1.60.0");
        assert_eq!(req.user.as_deref(), Some("lasote"));
        assert_eq!(req.channel.as_deref(), Some("stable"));
        assert_eq!(req.to_string(), "Boost/1.60.0@lasote/stable");
    }

    #[test]
    fn test_parse_without_channel() {
        let req: Requirement = "zlib/1.2.13".parse().unwrap();
        assert_eq!(req.user, None);
        assert_eq!(req.to_string(), "zlib/1.2.13");
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "Boost", "Boost/", "/1.0", "Boost/1.0@lasote", "Boost/1.0@/stable", "Bo ost/1.0"] {
            assert!(Requirement::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_cmake_name() {
        let req = Requirement::parse("google-test/1.8.0").unwrap();
        assert_eq!(req.cmake_name(), "GOOGLE_TEST");
    }
}
