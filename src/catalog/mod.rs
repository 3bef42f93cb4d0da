//! Product catalog with image uploads.
//!
//! - Domain types in [`domain`]
//! - Repository port in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
