//! Phone number input mask.

#[cfg(test)]
#[path = "phone_test.rs"]
mod phone_test;

use crate::config::PageConfig;
use crate::dom::{Document, NodeId};

/// Render the digits of `raw` as `(XXX) XXX-XXXX`.
///
/// Non-digits are dropped and digits past the tenth are ignored. Partial input
/// yields a partial mask (`"12345"` becomes `"(123) 45-"`); input without any
/// digit yields an empty string.
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    let part = |start: usize, end: usize| &digits[start.min(digits.len())..end.min(digits.len())];
    format!("({}) {}-{}", part(0, 3), part(3, 6), part(6, 10))
}

/// Phone inputs reformatted on every keystroke.
#[derive(Debug, Clone, Default)]
pub struct PhoneFormatter {
    inputs: Vec<NodeId>,
}

impl PhoneFormatter {
    #[must_use]
    pub fn wire(doc: &Document, config: &PageConfig) -> Self {
        let name = config.markers.phone_input_name.as_str();
        let inputs = doc.find_all(doc.root(), |el| el.is("input") && el.attr("name") == Some(name));
        tracing::debug!(count = inputs.len(), "phone formatter wired");
        Self { inputs }
    }

    #[must_use]
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Reformat `target` if it is a phone input. The caret is not restored;
    /// replacing the value leaves it at the end.
    pub fn on_input(&self, doc: &mut Document, target: NodeId) -> bool {
        if !self.inputs.contains(&target) {
            return false;
        }
        let Some(el) = doc.element(target) else {
            return false;
        };
        let formatted = format_phone(el.value());
        tracing::trace!(node = ?target, value = %formatted, "phone reformatted");
        if let Err(err) = doc.set_value(target, &formatted) {
            tracing::warn!(node = ?target, %err, "could not update phone input");
            return false;
        }
        true
    }
}
