//! Flash messages.
//!
//! One-time notifications ("Profile saved.") that a view attaches to the
//! rendering context of a response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Message severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Development-only detail.
    Debug,
    /// Informational message.
    #[default]
    Info,
    /// An action succeeded.
    Success,
    /// Something may need attention.
    Warning,
    /// An action failed.
    Error,
}

impl Level {
    /// Returns the level as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Numeric severity, ordered like the level itself.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Success => 25,
            Self::Warning => 30,
            Self::Error => 40,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(DomainError::UnknownMessageLevel(other.to_string())),
        }
    }
}

/// A flash message attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Severity.
    #[serde(default)]
    pub level: Level,
    /// Message text.
    pub text: String,
    /// Additional CSS-style tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_tags: Vec<String>,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            extra_tags: Vec::new(),
        }
    }

    /// Creates a debug message.
    #[must_use]
    pub fn debug(text: impl Into<String>) -> Self {
        Self::new(Level::Debug, text)
    }

    /// Creates an info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Level::Info, text)
    }

    /// Creates a success message.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Level::Success, text)
    }

    /// Creates a warning message.
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Level::Warning, text)
    }

    /// Creates an error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Level::Error, text)
    }

    /// Adds an extra tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.extra_tags.push(tag.into());
        self
    }

    /// Extra tags followed by the level name, space separated.
    #[must_use]
    pub fn tags(&self) -> String {
        let mut tags = self.extra_tags.clone();
        tags.push(self.level.as_str().to_string());
        tags.join(" ")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_from_str() {
        assert_eq!("Success".parse::<Level>().unwrap(), Level::Success);
        assert!("fatal".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_ordering_matches_value() {
        assert!(Level::Debug < Level::Error);
        assert!(Level::Success.value() > Level::Info.value());
    }

    #[test]
    fn test_message_tags() {
        let message = Message::warning("Low disk").with_tag("sticky");
        assert_eq!(message.tags(), "sticky warning");
        assert_eq!(message.to_string(), "Low disk");
    }
}
