//! Media store adapters.

pub mod cloudinary;
pub mod local;
pub mod memory;
