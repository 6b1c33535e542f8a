//! Step helper configuration.
//!
//! Defaults match a stock Sonata admin: the login form posts `_username` and
//! `_password` and is submitted with the "Connexion" button.

use crate::result::{StepError, StepResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for [`AdminSteps`](crate::AdminSteps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepsConfig {
    /// Path of the login page
    pub login_path: String,
    /// Username field locator
    pub username_field: String,
    /// Password field locator
    pub password_field: String,
    /// Label of the login submit button
    pub submit_button: String,
    /// Popin open/close wait timeout in milliseconds
    pub popin_timeout_ms: u64,
    /// Polling interval for waits in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            login_path: "/admin/login".to_string(),
            username_field: "_username".to_string(),
            password_field: "_password".to_string(),
            submit_button: "Connexion".to_string(),
            popin_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl StepsConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> StepResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load YAML from a file
    pub fn load(path: impl AsRef<Path>) -> StepResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check values that would make waits misbehave
    pub fn validate(&self) -> StepResult<()> {
        self.popin_wait().validate()?;
        if self.login_path.is_empty() {
            return Err(StepError::Config {
                message: "login_path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Set the login path
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Set the login field locators
    #[must_use]
    pub fn with_credential_fields(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username_field = username.into();
        self.password_field = password.into();
        self
    }

    /// Set the login submit button label
    #[must_use]
    pub fn with_submit_button(mut self, label: impl Into<String>) -> Self {
        self.submit_button = label.into();
        self
    }

    /// Set the popin wait timeout
    #[must_use]
    pub const fn with_popin_timeout(mut self, timeout_ms: u64) -> Self {
        self.popin_timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Wait options for popin waits
    #[must_use]
    pub const fn popin_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.popin_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StepsConfig::default();
        assert_eq!(config.username_field, "_username");
        assert_eq!(config.password_field, "_password");
        assert_eq!(config.submit_button, "Connexion");
        assert_eq!(config.popin_wait().timeout_ms, 5_000);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = StepsConfig::from_yaml_str("submit_button: Log in\npopin_timeout_ms: 250\n")
            .unwrap();
        assert_eq!(config.submit_button, "Log in");
        assert_eq!(config.popin_timeout_ms, 250);
        assert_eq!(config.login_path, "/admin/login");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = StepsConfig::from_yaml_str("popin_timeout_ms: [1, 2").unwrap_err();
        assert!(matches!(err, StepError::Yaml(_)));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = StepsConfig::from_yaml_str("poll_interval_ms: 0").unwrap_err();
        assert!(matches!(err, StepError::Config { .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "login_path: /backoffice/login").unwrap();
        let config = StepsConfig::load(file.path()).unwrap();
        assert_eq!(config.login_path, "/backoffice/login");
    }

    #[test]
    fn test_load_missing_file() {
        let err = StepsConfig::load("/nonexistent/admin-steps.yaml").unwrap_err();
        assert!(matches!(err, StepError::Io(_)));
    }

    #[test]
    fn test_builders() {
        let config = StepsConfig::new()
            .with_login_path("/login")
            .with_credential_fields("email", "pass")
            .with_submit_button("Sign in")
            .with_popin_timeout(100)
            .with_poll_interval(10);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.username_field, "email");
        assert_eq!(config.password_field, "pass");
        assert_eq!(config.submit_button, "Sign in");
        assert_eq!(config.popin_wait(), WaitOptions::new().with_timeout(100).with_poll_interval(10));
    }
}
