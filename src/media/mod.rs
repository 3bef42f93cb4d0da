//! Media storage for issue and product images.
//!
//! Images are uploaded to a [`ports::MediaStore`] before the owning entity
//! is persisted, and removed from it when the owning entity is deleted.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
