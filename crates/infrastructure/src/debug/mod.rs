//! Response debug reports.
//!
//! When `debug.print` is on, every fetched page is summarized through
//! `tracing` under the `expanse::debug` target. Run tests with
//! `RUST_LOG=expanse::debug=info` to see the reports.

use std::fmt::Write;

use expanse_domain::content::normalize;
use expanse_domain::{DebugSettings, TestResponse, TestUser};

/// Target used for debug reports.
pub const DEBUG_TARGET: &str = "expanse::debug";

/// Formats and emits response reports.
#[derive(Debug, Clone, Copy)]
pub struct DebugReporter<'a> {
    settings: &'a DebugSettings,
}

impl<'a> DebugReporter<'a> {
    /// Creates a reporter.
    #[must_use]
    pub const fn new(settings: &'a DebugSettings) -> Self {
        Self { settings }
    }

    /// Emits a report if printing is enabled.
    pub fn report(&self, response: &TestResponse, user: Option<&TestUser>) {
        if !self.settings.print {
            return;
        }
        let report = self.render(response, user);
        tracing::info!(target: DEBUG_TARGET, url = %response.url, status = response.status, "\n{report}");
    }

    /// Renders a report, honouring every section toggle.
    #[must_use]
    pub fn render(&self, response: &TestResponse, user: Option<&TestUser>) -> String {
        let settings = self.settings;
        let mut out = String::new();

        let _ = writeln!(out, "url: {} ({})", response.url, response.full_url);
        let _ = writeln!(out, "status: {}", response.status_code());
        for hop in &response.redirect_chain {
            let _ = writeln!(out, "  redirected ({}) -> {}", hop.status, hop.url);
        }

        if settings.print_user_info {
            match user {
                Some(user) => {
                    let _ = writeln!(
                        out,
                        "user: {} (active: {}, staff: {}, superuser: {})",
                        user.username, user.is_active, user.is_staff, user.is_superuser
                    );
                    if !user.permissions.is_empty() {
                        let permissions: Vec<&str> =
                            user.permissions.iter().map(String::as_str).collect();
                        let _ = writeln!(out, "  permissions: {}", permissions.join(", "));
                    }
                    if !user.groups.is_empty() {
                        let groups: Vec<&str> = user.groups.iter().map(String::as_str).collect();
                        let _ = writeln!(out, "  groups: {}", groups.join(", "));
                    }
                }
                None => {
                    let _ = writeln!(out, "user: anonymous");
                }
            }
        }

        if settings.print_headers && !response.headers.is_empty() {
            let _ = writeln!(out, "headers:");
            for (name, value) in &response.headers {
                let _ = writeln!(out, "  {name}: {value}");
            }
        }

        if settings.print_context && !response.context.variables.is_empty() {
            let _ = writeln!(out, "context:");
            for (key, value) in &response.context.variables {
                let _ = writeln!(out, "  {key}: {value}");
            }
        }

        if settings.print_messages && !response.context.messages.is_empty() {
            let _ = writeln!(out, "messages:");
            for message in &response.context.messages {
                let _ = writeln!(out, "  [{}] {}", message.level, message.text);
            }
        }

        if settings.print_content {
            let _ = writeln!(out, "content:\n{}", normalize(&response.body));
        }

        out
    }
}
