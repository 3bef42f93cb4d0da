//! Best-effort SMS notifications for issue lifecycle events.
//!
//! A [`ports::Notifier`] never fails the caller: delivery problems come back
//! as an undelivered [`domain::DeliveryReport`] and are only logged.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod templates;
