//! Client-side behaviors for the contacts web page.
//!
//! The server renders the page; this crate adds the interactive layer on top
//! of it: client-side form validation, the password confirmation check, a
//! confirmation prompt before deleting a contact, auto-dismissing flash
//! alerts, the phone number input mask, hover tooltips, and search and sort
//! for the contacts table.
//!
//! Behaviors act on an in-memory [`dom::Document`] and are driven by explicit
//! events, so the host decides where events and time come from and every
//! behavior can be exercised without a browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | Page-ready wiring and event dispatch ([`page::PageBehaviors`]) |
//! | [`dom`] | Arena document model the behaviors read and mutate |
//! | [`config`] | Element markers, messages, and the alert delay |
//! | [`forms`] | Required/email validation and the password match check |
//! | [`confirm`] | Delete confirmation and the [`confirm::Confirm`] port |
//! | [`alerts`] | Timed and manual alert dismissal |
//! | [`phone`] | `(XXX) XXX-XXXX` input mask |
//! | [`tooltip`] | Hover tooltips |
//! | [`table`] | Contacts table search and exchange sort |
//! | [`timers`] | One-shot timer queue driven by the host clock |

pub mod alerts;
pub mod config;
pub mod confirm;
pub mod dom;
pub mod forms;
pub mod page;
pub mod phone;
pub mod table;
pub mod timers;
pub mod tooltip;

pub use config::PageConfig;
pub use confirm::{AlwaysAccept, AlwaysDecline, Confirm};
pub use dom::{Document, NodeId};
pub use page::{Event, EventOutcome, PageBehaviors};
