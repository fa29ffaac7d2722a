//! Client-side form validation.
//!
//! `FormGuard` checks required fields and the email field of opted-in forms
//! when they are submitted. `PasswordMatcher` live-checks the confirmation
//! field of the registration form. Both report failures as a field-level
//! error: the `is-invalid` class on the field plus one `invalid-feedback`
//! node directly after it.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::sync::LazyLock;

use regex::Regex;

use crate::config::PageConfig;
use crate::dom::{Document, DomError, NodeId};

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
    Ok(re) => Some(re),
    Err(err) => {
        tracing::error!(%err, "email pattern failed to compile");
        None
    }
});

/// Whether `value` has the shape `local@domain.tld` with no whitespace and a
/// single `@` per part.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(value))
}

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// Mark `field` invalid and show `message` right after it, replacing any
/// message already shown for it.
pub fn show_field_error(doc: &mut Document, field: NodeId, message: &str, config: &PageConfig) {
    clear_field_error(doc, field, config);
    if let Err(err) = attach_feedback(doc, field, message, config) {
        tracing::warn!(node = ?field, %err, "could not attach field error");
    }
}

fn attach_feedback(doc: &mut Document, field: NodeId, message: &str, config: &PageConfig) -> Result<(), DomError> {
    doc.add_class(field, &config.markers.invalid_class)?;
    let feedback = doc.create_element("div");
    doc.add_class(feedback, &config.markers.feedback_class)?;
    doc.set_text_content(feedback, message)?;
    doc.insert_after(field, feedback)
}

/// Remove the invalid marker and every feedback node directly after `field`.
pub fn clear_field_error(doc: &mut Document, field: NodeId, config: &PageConfig) {
    if let Err(err) = detach_feedback(doc, field, config) {
        tracing::warn!(node = ?field, %err, "could not clear field error");
    }
}

fn detach_feedback(doc: &mut Document, field: NodeId, config: &PageConfig) -> Result<(), DomError> {
    doc.remove_class(field, &config.markers.invalid_class)?;
    while let Some(next) = doc.next_sibling(field) {
        if !doc.element(next).is_some_and(|el| el.has_class(&config.markers.feedback_class)) {
            break;
        }
        doc.remove(next)?;
    }
    Ok(())
}

/// The field-level error message currently shown for `field`, if any.
#[must_use]
pub fn field_error(doc: &Document, field: NodeId, config: &PageConfig) -> Option<String> {
    let next = doc.next_sibling(field)?;
    doc.element(next)
        .is_some_and(|el| el.has_class(&config.markers.feedback_class))
        .then(|| doc.text_content(next))
}

// =============================================================================
// FORM GUARD
// =============================================================================

/// Validate every required field of `form` plus its email field.
///
/// Every field is visited even after the first failure so that all errors
/// are shown at once.
pub fn validate_form(doc: &mut Document, form: NodeId, config: &PageConfig) -> bool {
    let markers = &config.markers;
    let mut valid = true;

    for field in doc.find_all(form, |el| el.has_attr(&markers.required_attr)) {
        let filled = doc.element(field).is_some_and(|el| !el.value().trim().is_empty());
        if filled {
            clear_field_error(doc, field, config);
        } else {
            show_field_error(doc, field, &config.messages.required, config);
            valid = false;
        }
    }

    let email = doc.find_first(form, |el| {
        el.is("input") && el.attr("type").is_some_and(|t| t.eq_ignore_ascii_case(&markers.email_input_type))
    });
    if let Some(field) = email {
        let value = doc.element(field).map(|el| el.value().to_string()).unwrap_or_default();
        if !value.trim().is_empty() {
            if is_valid_email(&value) {
                clear_field_error(doc, field, config);
            } else {
                show_field_error(doc, field, &config.messages.invalid_email, config);
                valid = false;
            }
        }
    }

    valid
}

/// Forms opted into client-side validation.
#[derive(Debug, Clone, Default)]
pub struct FormGuard {
    forms: Vec<NodeId>,
}

impl FormGuard {
    /// Collect every form carrying the no-built-in-validation marker.
    #[must_use]
    pub fn wire(doc: &Document, config: &PageConfig) -> Self {
        let forms = doc.find_all(doc.root(), |el| el.is("form") && el.has_attr(&config.markers.novalidate_attr));
        tracing::debug!(count = forms.len(), "form guard wired");
        Self { forms }
    }

    #[must_use]
    pub fn forms(&self) -> &[NodeId] {
        &self.forms
    }

    /// Run validation for a submit of `form`. Returns `None` when the form is
    /// not guarded, otherwise whether the submit may proceed.
    pub fn on_submit(&self, doc: &mut Document, form: NodeId, config: &PageConfig) -> Option<bool> {
        if !self.forms.contains(&form) {
            return None;
        }
        let valid = validate_form(doc, form, config);
        if !valid {
            tracing::debug!(node = ?form, "submit rejected by client-side validation");
        }
        Some(valid)
    }
}

// =============================================================================
// PASSWORD MATCHER
// =============================================================================

/// Compare the two password fields and show or clear the mismatch error on
/// the confirmation field. Returns whether they match exactly.
pub fn validate_password_match(doc: &mut Document, password: NodeId, confirm: NodeId, config: &PageConfig) -> bool {
    let value_of = |id: NodeId| doc.element(id).map(|el| el.value().to_string()).unwrap_or_default();
    let (first, second) = (value_of(password), value_of(confirm));
    if first == second {
        clear_field_error(doc, confirm, config);
        true
    } else {
        show_field_error(doc, confirm, &config.messages.password_mismatch, config);
        false
    }
}

/// The password and confirmation fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordMatcher {
    pub password: NodeId,
    pub confirm: NodeId,
}

impl PasswordMatcher {
    /// Wire only when a registration form exists and both fields are present.
    #[must_use]
    pub fn wire(doc: &Document, config: &PageConfig) -> Option<Self> {
        let markers = &config.markers;
        doc.find_first(doc.root(), |el| {
            el.is("form") && el.attr("action").is_some_and(|a| a.contains(&markers.register_action))
        })?;
        let matcher = Self { password: doc.by_id(&markers.password_id)?, confirm: doc.by_id(&markers.confirm_password_id)? };
        tracing::debug!(password = ?matcher.password, confirm = ?matcher.confirm, "password matcher wired");
        Some(matcher)
    }

    /// Handle an input event. Returns `None` unless `target` is the
    /// confirmation field.
    pub fn on_input(&self, doc: &mut Document, target: NodeId, config: &PageConfig) -> Option<bool> {
        (target == self.confirm).then(|| self.check(doc, config))
    }

    pub fn check(&self, doc: &mut Document, config: &PageConfig) -> bool {
        validate_password_match(doc, self.password, self.confirm, config)
    }
}
