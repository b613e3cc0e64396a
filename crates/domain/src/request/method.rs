//! Request methods a test client can issue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// HTTP method of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Returns true for methods whose form data travels in the query string.
    #[must_use]
    pub const fn sends_data_as_query(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Delete)
    }

    /// Method used for the next request after a redirect with `status`.
    ///
    /// 303 always switches to GET; 301 and 302 switch a POST to GET, as
    /// browsers do. 307 and 308 keep the method.
    #[must_use]
    pub const fn after_redirect(self, status: u16) -> Self {
        match (self, status) {
            (Self::Head, _) => Self::Head,
            (_, 303) | (Self::Post, 301 | 302) => Self::Get,
            (method, _) => method,
        }
    }

    /// Returns the method as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            other => Err(DomainError::UnsupportedMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_from_str() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_redirect_method_rewrite() {
        assert_eq!(HttpMethod::Post.after_redirect(302), HttpMethod::Get);
        assert_eq!(HttpMethod::Post.after_redirect(307), HttpMethod::Post);
        assert_eq!(HttpMethod::Put.after_redirect(303), HttpMethod::Get);
        assert_eq!(HttpMethod::Put.after_redirect(302), HttpMethod::Put);
        assert_eq!(HttpMethod::Head.after_redirect(303), HttpMethod::Head);
    }

    #[test]
    fn test_data_placement() {
        assert!(HttpMethod::Get.sends_data_as_query());
        assert!(!HttpMethod::Post.sends_data_as_query());
    }
}
