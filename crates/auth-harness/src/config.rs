//! Configuration for the test suites
//!
//! Everything that is test *data* rather than harness logic lives here: the
//! target application's URLs, the selectors for every field and control, the
//! CSS convention that marks a field invalid, the wait budgets, and the
//! credentials of the known account. The application's markup can change
//! without touching any harness code; only `suite.toml` is edited.
//!
//! # Example
//!
//! ```
//! use auth_harness::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::default_suite()?;
//! assert!(config.app.sign_in_url.ends_with("/auth/sign-in"));
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::form::FieldLocator;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target application URLs
    pub app: AppConfig,
    /// Wait budgets
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Validation-state conventions of the target application
    pub validation: ValidationConfig,
    /// Credentials for the known, already-registered account
    pub credentials: Credentials,
    /// Per-page selector maps
    pub pages: Pages,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// The configuration shipped with the crate (`suite.toml`)
    pub fn default_suite() -> anyhow::Result<Self> {
        Self::from_str(include_str!("../suite.toml"))
    }
}

/// Target application URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sign-in page
    pub sign_in_url: String,
    /// Sign-up page
    pub sign_up_url: String,
    /// Fragment expected in the URL of the authenticated area
    pub panel_url_fragment: String,
}

/// Wait budgets, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Implicit element-lookup timeout (default: 10s)
    #[serde(default = "default_implicit_ms")]
    pub implicit_ms: u64,
    /// Explicit wait timeout for named conditions (default: 10s)
    #[serde(default = "default_explicit_ms")]
    pub explicit_ms: u64,
    /// Poll interval for bounded waits (default: 250ms)
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
    /// Window in which a negative outcome (URL unchanged, message absent)
    /// must hold before it counts as confirmed (default: 2s)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            implicit_ms: default_implicit_ms(),
            explicit_ms: default_explicit_ms(),
            poll_ms: default_poll_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

fn default_implicit_ms() -> u64 {
    10_000
}

fn default_explicit_ms() -> u64 {
    10_000
}

fn default_poll_ms() -> u64 {
    250
}

fn default_settle_ms() -> u64 {
    2_000
}

impl TimeoutConfig {
    pub fn implicit(&self) -> Duration {
        Duration::from_millis(self.implicit_ms)
    }

    pub fn explicit(&self) -> Duration {
        Duration::from_millis(self.explicit_ms)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Validation-state conventions of the target application
///
/// The harness never hardcodes these; "field is invalid" means "its class
/// list contains `invalid_marker_class`", whatever that class is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// CSS class marking a client-side-invalid field (e.g. `ng-invalid`)
    pub invalid_marker_class: String,
    /// Selector of the inline error message element
    pub error_message_selector: String,
    /// Selector of the success toast element
    pub success_message_selector: String,
    /// Exact text of the password-mismatch error
    pub mismatch_error_text: String,
    /// Exact text of the registration success toast
    pub success_text: String,
}

/// Credentials for the known account used by the sign-in suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Selector maps for every page the suites touch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pages {
    pub sign_in: PageSelectors,
    pub sign_up: PageSelectors,
    pub panel: PanelSelectors,
}

/// A form page: named fields plus the submit control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelectors {
    /// Form fields by logical name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldLocator>,
    /// The submit control
    pub submit: FieldLocator,
}

impl PageSelectors {
    /// Look up a field locator by its logical name
    pub fn field(&self, name: &str) -> crate::error::HarnessResult<&FieldLocator> {
        self.fields.get(name).ok_or_else(|| {
            crate::error::HarnessError::Config(format!("no selector configured for field '{name}'"))
        })
    }
}

/// Elements of the authenticated area used by the logout flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSelectors {
    /// Header element showing the signed-in user's name
    pub user_name: FieldLocator,
    /// Control that opens the profile dropdown
    pub profile_menu: FieldLocator,
    /// Sign-out link inside the dropdown
    pub logout_link: FieldLocator,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
            [app]
            sign_in_url = "https://example.com/auth/sign-in"
            sign_up_url = "https://example.com/auth/sign-up"
            panel_url_fragment = "panel"

            [validation]
            invalid_marker_class = "ng-invalid"
            error_message_selector = "span.text-error"
            success_message_selector = "div.toast"
            mismatch_error_text = "Passwords do not match"
            success_text = "Successful registration!"

            [credentials]
            email = "user@example.com"
            password = "Password1!"

            [pages.sign_in]
            submit = { css = "form button" }

            [pages.sign_up]
            submit = { css = "form button" }

            [pages.panel]
            user_name = { css = "h2" }
            profile_menu = { css = "label" }
            logout_link = { css = "ul li a" }
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.timeouts.implicit_ms, 10_000);
        assert_eq!(config.timeouts.explicit_ms, 10_000);
        assert_eq!(config.timeouts.poll_ms, 250);
        assert_eq!(config.timeouts.settle_ms, 2_000);
        assert_eq!(config.validation.invalid_marker_class, "ng-invalid");
        assert!(config.pages.sign_in.fields.is_empty());
    }

    #[test]
    fn test_parse_field_locators() {
        let toml = r##"
            [app]
            sign_in_url = "https://example.com/auth/sign-in"
            sign_up_url = "https://example.com/auth/sign-up"
            panel_url_fragment = "panel"

            [validation]
            invalid_marker_class = "ng-invalid"
            error_message_selector = "span.text-error"
            success_message_selector = "div.toast"
            mismatch_error_text = "Passwords do not match"
            success_text = "Successful registration!"

            [credentials]
            email = "user@example.com"
            password = "Password1!"

            [pages.sign_in]
            submit = { css = "form button" }

            [pages.sign_up]
            submit = { css = "form button" }
            [pages.sign_up.fields]
            full_name = { id = "full-name" }
            email = { id = "email" }
            password = { css = "#password", index = 1 }

            [pages.panel]
            user_name = { css = "h2" }
            profile_menu = { css = "label" }
            logout_link = { css = "ul li a" }
        "##;

        let config = Config::from_str(toml).unwrap();
        let fields = &config.pages.sign_up.fields;
        assert_eq!(
            fields["full_name"],
            FieldLocator::Id {
                id: "full-name".to_string()
            }
        );
        assert_eq!(
            fields["password"],
            FieldLocator::Nth {
                css: "#password".to_string(),
                index: 1
            }
        );
        assert!(matches!(fields["email"], FieldLocator::Id { .. }));
    }

    #[test]
    fn test_field_lookup_failure_is_config_error() {
        let selectors = PageSelectors {
            fields: BTreeMap::new(),
            submit: FieldLocator::Css {
                css: "button".to_string(),
            },
        };
        let err = selectors.field("email").unwrap_err();
        assert!(err.to_string().contains("no selector configured"));
    }

    #[test]
    fn test_default_suite_parses() {
        let config = Config::default_suite().unwrap();
        assert!(config.app.sign_in_url.contains("sign-in"));
        assert!(config.app.sign_up_url.contains("sign-up"));
        assert_eq!(config.app.panel_url_fragment, "panel");
        // Both form pages must name their submit control and the sign-up
        // page must know all four fields the suites fill.
        for name in ["full_name", "email", "password", "confirm_password"] {
            assert!(config.pages.sign_up.fields.contains_key(name), "{name}");
        }
    }

    #[test]
    fn test_timeout_accessors() {
        let timeouts = TimeoutConfig::default();
        assert_eq!(timeouts.implicit(), Duration::from_secs(10));
        assert_eq!(timeouts.poll(), Duration::from_millis(250));
        assert_eq!(timeouts.settle(), Duration::from_secs(2));
    }
}
