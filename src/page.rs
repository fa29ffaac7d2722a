//! Page-ready wiring and event dispatch.
//!
//! [`PageBehaviors::init`] is called once when the server-rendered page is
//! ready. It discovers the elements each behavior attaches to and schedules
//! the alert timers. From then on the host feeds events through
//! [`PageBehaviors::dispatch`] and moves the clock with
//! [`PageBehaviors::advance`]. Every handler runs to completion on the
//! caller's thread; none of them can observe another mid-flight.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::time::Duration;

use crate::alerts::{self, AlertDismisser};
use crate::config::PageConfig;
use crate::confirm::{ClickDecision, Confirm, DeleteConfirmer};
use crate::dom::{Document, NodeId};
use crate::forms::{FormGuard, PasswordMatcher};
use crate::phone::PhoneFormatter;
use crate::table::{self, SortOutcome};
use crate::timers::{TimerQueue, TimerTask};
use crate::tooltip::TooltipBinder;

/// A user event targeted at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A form is being submitted.
    Submit(NodeId),
    /// The value of a control changed.
    Input(NodeId),
    /// A node was clicked.
    Click(NodeId),
    /// The pointer moved onto a node.
    PointerEnter(NodeId),
    /// The pointer left a node.
    PointerLeave(NodeId),
}

/// What the handlers did to the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The browser's default action (submit, navigation) must not happen.
    pub default_prevented: bool,
    /// Ancestor handlers must not see the event.
    pub propagation_stopped: bool,
}

impl EventOutcome {
    fn prevent_and_stop() -> Self {
        Self { default_prevented: true, propagation_stopped: true }
    }

    fn prevent() -> Self {
        Self { default_prevented: true, propagation_stopped: false }
    }
}

/// All behaviors of one page view, together with the document they act on.
pub struct PageBehaviors {
    doc: Document,
    config: PageConfig,
    confirm: Box<dyn Confirm>,
    timers: TimerQueue,
    form_guard: FormGuard,
    password: Option<PasswordMatcher>,
    deletes: DeleteConfirmer,
    alerts: AlertDismisser,
    phones: PhoneFormatter,
    tooltips: TooltipBinder,
}

impl PageBehaviors {
    /// Wire every behavior against `doc`. Behaviors whose elements are
    /// missing are simply inactive.
    pub fn init(mut doc: Document, config: PageConfig, confirm: impl Confirm + 'static) -> Self {
        let mut timers = TimerQueue::new();
        let form_guard = FormGuard::wire(&doc, &config);
        let password = PasswordMatcher::wire(&doc, &config);
        let deletes = DeleteConfirmer::wire(&doc, &config);
        let alerts = AlertDismisser::wire(&doc, &config, &mut timers);
        let phones = PhoneFormatter::wire(&doc, &config);
        let tooltips = TooltipBinder::wire(&mut doc, &config);
        tracing::debug!(password_check = password.is_some(), "page behaviors ready");
        Self { doc, config, confirm: Box::new(confirm), timers, form_guard, password, deletes, alerts, phones, tooltips }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for the host, e.g. to type into a field before
    /// dispatching the matching [`Event::Input`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Timers not yet fired.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deliver one event to every behavior interested in it.
    pub fn dispatch(&mut self, event: Event) -> EventOutcome {
        match event {
            Event::Submit(form) => self.on_submit(form),
            Event::Input(target) => {
                self.phones.on_input(&mut self.doc, target);
                if let Some(matcher) = self.password {
                    matcher.on_input(&mut self.doc, target, &self.config);
                }
                EventOutcome::default()
            }
            Event::Click(target) => self.on_click(target),
            Event::PointerEnter(target) => {
                self.tooltips.on_enter(&mut self.doc, target);
                EventOutcome::default()
            }
            Event::PointerLeave(target) => {
                self.tooltips.on_leave(&mut self.doc, target);
                EventOutcome::default()
            }
        }
    }

    fn on_submit(&mut self, form: NodeId) -> EventOutcome {
        match self.form_guard.on_submit(&mut self.doc, form, &self.config) {
            Some(false) => EventOutcome::prevent_and_stop(),
            Some(true) | None => EventOutcome::default(),
        }
    }

    fn on_click(&mut self, target: NodeId) -> EventOutcome {
        let decision = self.deletes.on_click(&self.doc, target, &self.config, self.confirm.as_mut());
        if decision == Some(ClickDecision::Cancel) {
            return EventOutcome::prevent();
        }
        self.alerts.on_click(&mut self.doc, target, &self.config);
        EventOutcome::default()
    }

    /// Advance the page clock by `elapsed` and run every timer now due.
    /// Returns how many timers fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let due = self.timers.advance(elapsed);
        for task in &due {
            match *task {
                TimerTask::DismissAlert(alert) => {
                    alerts::dismiss(&mut self.doc, alert);
                }
            }
        }
        due.len()
    }

    /// Re-run the password comparison outside of an input event. `None` when
    /// the page has no registration form.
    pub fn check_passwords(&mut self) -> Option<bool> {
        let matcher = self.password?;
        Some(matcher.check(&mut self.doc, &self.config))
    }

    /// Filter the contacts table by the current value of the search input.
    /// Returns the number of visible rows, or `None` if the page lacks the
    /// table or the search input.
    pub fn search_contacts(&mut self) -> Option<usize> {
        let input = self.doc.by_id(&self.config.markers.search_input_id)?;
        let query = self.doc.element(input)?.value().to_string();
        let table = table::find_table(&self.doc)?;
        Some(table::search(&mut self.doc, table, &query))
    }

    /// Sort the contacts table by `column`. `None` if the page has no table.
    pub fn sort_table(&mut self, column: usize) -> Option<SortOutcome> {
        let table = table::find_table(&self.doc)?;
        match table::sort(&mut self.doc, table, column) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                tracing::warn!(column, %err, "table sort aborted");
                None
            }
        }
    }
}
