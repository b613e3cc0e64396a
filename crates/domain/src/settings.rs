//! Assertion Settings
//!
//! Knobs that change how responses are fetched, reported and asserted on.
//! Every field has a default, so partial configuration files deserialize.

use serde::{Deserialize, Serialize};

/// Debug output toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugSettings {
    /// Report every fetched response.
    #[serde(default)]
    pub print: bool,

    /// Include response headers in the report.
    #[serde(default = "default_true")]
    pub print_headers: bool,

    /// Include template context variables.
    #[serde(default = "default_true")]
    pub print_context: bool,

    /// Include flash messages.
    #[serde(default = "default_true")]
    pub print_messages: bool,

    /// Include the logged-in user.
    #[serde(default = "default_true")]
    pub print_user_info: bool,

    /// Include the minimized page content.
    #[serde(default = "default_true")]
    pub print_content: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            print: false,
            print_headers: true,
            print_context: true,
            print_messages: true,
            print_user_info: true,
            print_content: true,
        }
    }
}

/// Defaults for assertion helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSettings {
    /// Context messages match on substrings unless told otherwise.
    #[serde(default = "default_true")]
    pub allow_message_partials: bool,

    /// Page titles match on substrings unless told otherwise.
    #[serde(default)]
    pub allow_title_partials: bool,

    /// Neighbouring expected values listed when content matching fails.
    #[serde(default = "default_diagnostic_window")]
    pub diagnostic_window: usize,

    /// Characters of surrounding content shown when content matching fails.
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
}

impl Default for AssertionSettings {
    fn default() -> Self {
        Self {
            allow_message_partials: true,
            allow_title_partials: false,
            diagnostic_window: default_diagnostic_window(),
            context_chars: default_context_chars(),
        }
    }
}

/// How pages are requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Prefix for `full_url`.
    #[serde(default = "default_site_root_url")]
    pub site_root_url: String,

    /// Log in `default_login_user` when no user is given.
    #[serde(default = "default_true")]
    pub auto_login: bool,

    /// Username used by auto login.
    #[serde(default = "default_login_user")]
    pub default_login_user: String,

    /// Password given to fixture users.
    #[serde(default = "default_user_password")]
    pub default_user_password: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            site_root_url: default_site_root_url(),
            auto_login: true,
            default_login_user: default_login_user(),
            default_user_password: default_user_password(),
        }
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Debug output.
    #[serde(default)]
    pub debug: DebugSettings,

    /// Assertion defaults.
    #[serde(default)]
    pub assertions: AssertionSettings,

    /// Client behavior.
    #[serde(default)]
    pub client: ClientSettings,
}

const fn default_true() -> bool {
    true
}

const fn default_diagnostic_window() -> usize {
    3
}

const fn default_context_chars() -> usize {
    40
}

fn default_site_root_url() -> String {
    "http://127.0.0.1/".to_string()
}

fn default_login_user() -> String {
    "test_user".to_string()
}

fn default_user_password() -> String {
    "password".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert!(!settings.debug.print);
        assert!(settings.debug.print_content);
        assert!(settings.assertions.allow_message_partials);
        assert!(!settings.assertions.allow_title_partials);
        assert_eq!(settings.assertions.diagnostic_window, 3);
        assert_eq!(settings.client.site_root_url, "http://127.0.0.1/");
        assert_eq!(settings.client.default_login_user, "test_user");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"debug": {"print": true}, "client": {"auto_login": false}}"#)
                .unwrap();
        assert!(settings.debug.print);
        assert!(settings.debug.print_headers);
        assert!(!settings.client.auto_login);
        assert_eq!(settings.client.default_user_password, "password");
        assert_eq!(settings.assertions, AssertionSettings::default());
    }
}
