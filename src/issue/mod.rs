//! Issue lifecycle management.
//!
//! This module implements the support-ticket workflow: the issue state
//! machine, its message thread, technician assignment and image handling,
//! together with the authorization rules for each operation. It follows the
//! hexagonal layout used across the crate:
//!
//! - Domain types in [`domain`]
//! - Repository port in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
