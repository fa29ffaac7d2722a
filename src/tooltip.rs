//! Hover tooltips for elements marked `data-bs-toggle="tooltip"`.
//!
//! At wiring time each trigger's `title` moves to `data-bs-original-title` so
//! only one tooltip is shown. Entering a trigger appends a tooltip node to the
//! body and links it with `aria-describedby`; leaving removes both.

#[cfg(test)]
#[path = "tooltip_test.rs"]
mod tooltip_test;

use std::collections::HashMap;

use crate::config::PageConfig;
use crate::dom::{Document, DomError, NodeId};

const ORIGINAL_TITLE_ATTR: &str = "data-bs-original-title";

#[derive(Debug, Clone, Default)]
pub struct TooltipBinder {
    triggers: Vec<NodeId>,
    open: HashMap<NodeId, NodeId>,
    next_id: u32,
}

impl TooltipBinder {
    pub fn wire(doc: &mut Document, config: &PageConfig) -> Self {
        let toggle = config.markers.tooltip_toggle.as_str();
        let triggers = doc.find_all(doc.root(), |el| el.attr("data-bs-toggle") == Some(toggle));
        for trigger in &triggers {
            if let Err(err) = stash_title(doc, *trigger) {
                tracing::warn!(node = ?trigger, %err, "could not prepare tooltip trigger");
            }
        }
        tracing::debug!(count = triggers.len(), "tooltips wired");
        Self { triggers, open: HashMap::new(), next_id: 0 }
    }

    #[must_use]
    pub fn triggers(&self) -> &[NodeId] {
        &self.triggers
    }

    /// The tooltip node currently shown for `trigger`.
    #[must_use]
    pub fn tooltip_for(&self, trigger: NodeId) -> Option<NodeId> {
        self.open.get(&trigger).copied()
    }

    fn trigger_of(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        std::iter::once(target)
            .chain(doc.ancestors(target))
            .find(|n| self.triggers.contains(n))
    }

    /// Show the tooltip of the trigger containing `target`. Returns the
    /// tooltip node, or `None` if there is no trigger or no title text.
    pub fn on_enter(&mut self, doc: &mut Document, target: NodeId) -> Option<NodeId> {
        let trigger = self.trigger_of(doc, target)?;
        if let Some(existing) = self.open.get(&trigger) {
            return Some(*existing);
        }
        let text = doc.element(trigger)?.attr(ORIGINAL_TITLE_ATTR).unwrap_or("").to_string();
        if text.is_empty() {
            return None;
        }
        let tip_id = format!("tooltip{}", self.next_id);
        self.next_id += 1;
        match show(doc, trigger, &tip_id, &text) {
            Ok(tip) => {
                tracing::trace!(node = ?trigger, "tooltip shown");
                self.open.insert(trigger, tip);
                Some(tip)
            }
            Err(err) => {
                tracing::warn!(node = ?trigger, %err, "could not show tooltip");
                None
            }
        }
    }

    /// Hide the tooltip of the trigger containing `target`. Returns whether
    /// one was open.
    pub fn on_leave(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let Some(trigger) = self.trigger_of(doc, target) else {
            return false;
        };
        let Some(tip) = self.open.remove(&trigger) else {
            return false;
        };
        if let Err(err) = doc.remove(tip).and_then(|()| doc.remove_attr(trigger, "aria-describedby")) {
            tracing::warn!(node = ?trigger, %err, "could not hide tooltip");
        }
        true
    }
}

fn stash_title(doc: &mut Document, trigger: NodeId) -> Result<(), DomError> {
    let Some(title) = doc.element(trigger).and_then(|el| el.attr("title")).map(str::to_string) else {
        return Ok(());
    };
    doc.set_attr(trigger, ORIGINAL_TITLE_ATTR, &title)?;
    doc.remove_attr(trigger, "title")
}

fn show(doc: &mut Document, trigger: NodeId, tip_id: &str, text: &str) -> Result<NodeId, DomError> {
    let host = doc.find_first(doc.root(), |el| el.is("body")).unwrap_or(doc.root());
    let tip = doc.append_element(host, "div", &[("class", "tooltip fade show"), ("role", "tooltip"), ("id", tip_id)])?;
    doc.append_element(tip, "div", &[("class", "tooltip-arrow")])?;
    let inner = doc.append_element(tip, "div", &[("class", "tooltip-inner")])?;
    doc.append_text(inner, text)?;
    doc.set_attr(trigger, "aria-describedby", tip_id)?;
    Ok(tip)
}
