//! Notifier adapters.

pub mod disabled;
pub mod recording;
pub mod sms_gateway;
