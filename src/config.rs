//! Page configuration: which elements the behaviors attach to and what they say.
//!
//! `PageConfig::default()` matches the markup the contacts server renders.
//! Hosts that render different markup override individual keys with
//! [`PageConfig::from_json`]; absent keys keep their defaults.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_ALERT_DELAY_MS: u64 = 5000;

pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required.";
pub const DEFAULT_EMAIL_MESSAGE: &str = "Please enter a valid email.";
pub const DEFAULT_PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const DEFAULT_DELETE_PROMPT: &str =
    "Are you sure you want to delete this contact? This action cannot be undone.";

/// Error returned by [`PageConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input is not valid JSON or has a field of the wrong type.
    #[error("failed to parse page config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A marker that is matched by substring was configured as empty, which
    /// would match every element.
    #[error("config key `{0}` must not be empty")]
    EmptyMarker(&'static str),
}

/// Identifiers, attribute names, and class names the behaviors look for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Attribute that opts a form into client-side validation.
    pub novalidate_attr: String,
    /// Attribute marking a field as required.
    pub required_attr: String,
    /// `type` of the email input checked by the email rule.
    pub email_input_type: String,
    /// Substring of a form's `action` identifying the registration form.
    pub register_action: String,
    pub password_id: String,
    pub confirm_password_id: String,
    /// Substrings of a link's `href` identifying a delete link.
    pub delete_hrefs: Vec<String>,
    /// `name` of phone inputs.
    pub phone_input_name: String,
    pub alert_class: String,
    pub alert_role: String,
    /// Value of `data-bs-dismiss` on an alert's close control.
    pub dismiss_target: String,
    /// Value of `data-bs-toggle` on tooltip triggers.
    pub tooltip_toggle: String,
    pub search_input_id: String,
    pub invalid_class: String,
    pub feedback_class: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            novalidate_attr: "novalidate".into(),
            required_attr: "required".into(),
            email_input_type: "email".into(),
            register_action: "register".into(),
            password_id: "password".into(),
            confirm_password_id: "confirm_password".into(),
            delete_hrefs: vec!["delete".into(), "eliminar".into()],
            phone_input_name: "telefono".into(),
            alert_class: "alert".into(),
            alert_role: "alert".into(),
            dismiss_target: "alert".into(),
            tooltip_toggle: "tooltip".into(),
            search_input_id: "searchInput".into(),
            invalid_class: "is-invalid".into(),
            feedback_class: "invalid-feedback".into(),
        }
    }
}

/// User-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub required: String,
    pub invalid_email: String,
    pub password_mismatch: String,
    pub delete_prompt: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            required: DEFAULT_REQUIRED_MESSAGE.into(),
            invalid_email: DEFAULT_EMAIL_MESSAGE.into(),
            password_mismatch: DEFAULT_PASSWORD_MISMATCH_MESSAGE.into(),
            delete_prompt: DEFAULT_DELETE_PROMPT.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub markers: Markers,
    pub messages: Messages,
    pub alert_delay_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self { markers: Markers::default(), messages: Messages::default(), alert_delay_ms: DEFAULT_ALERT_DELAY_MS }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    ///
    /// ```json
    /// { "markers": { "delete_hrefs": ["remove"] }, "alert_delay_ms": 3000 }
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.markers.register_action.is_empty() {
            return Err(ConfigError::EmptyMarker("markers.register_action"));
        }
        if self.markers.delete_hrefs.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyMarker("markers.delete_hrefs"));
        }
        Ok(())
    }

    /// Delay before an alert is dismissed automatically.
    #[must_use]
    pub fn alert_delay(&self) -> Duration {
        Duration::from_millis(self.alert_delay_ms)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
