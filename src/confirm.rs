//! Delete confirmation.
//!
//! Links whose `href` names a delete route ask the user before navigating.
//! The question is answered by a [`Confirm`] port injected by the host: a
//! modal dialog in a browser, a stub in tests, or a terminal prompt.

#[cfg(test)]
#[path = "confirm_test.rs"]
mod confirm_test;

use crate::config::PageConfig;
use crate::dom::{Document, NodeId};

/// Source of a blocking yes/no decision.
pub trait Confirm {
    /// Ask `message` and block until answered. `true` means proceed.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Answers yes to every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl Confirm for AlwaysAccept {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Answers no to every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl Confirm for AlwaysDecline {
    fn confirm(&mut self, _message: &str) -> bool {
        false
    }
}

/// What happens to an intercepted click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDecision {
    /// Navigation proceeds unmodified.
    Proceed,
    /// Default navigation is cancelled.
    Cancel,
}

/// Whether `href` points at a delete route.
#[must_use]
pub fn is_delete_href(href: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| href.contains(m.as_str()))
}

/// Delete links found at initialization.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfirmer {
    links: Vec<NodeId>,
}

impl DeleteConfirmer {
    #[must_use]
    pub fn wire(doc: &Document, config: &PageConfig) -> Self {
        let markers = &config.markers.delete_hrefs;
        let links = doc.find_all(doc.root(), |el| {
            el.is("a") && el.attr("href").is_some_and(|href| is_delete_href(href, markers))
        });
        tracing::debug!(count = links.len(), "delete confirmer wired");
        Self { links }
    }

    #[must_use]
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    /// Handle a click on `target` or one of its descendants. Returns `None`
    /// when the click did not land inside a delete link.
    pub fn on_click(
        &self,
        doc: &Document,
        target: NodeId,
        config: &PageConfig,
        confirm: &mut dyn Confirm,
    ) -> Option<ClickDecision> {
        let link = std::iter::once(target)
            .chain(doc.ancestors(target))
            .find(|n| self.links.contains(n))?;
        if confirm.confirm(&config.messages.delete_prompt) {
            Some(ClickDecision::Proceed)
        } else {
            tracing::debug!(node = ?link, "delete cancelled by user");
            Some(ClickDecision::Cancel)
        }
    }
}
