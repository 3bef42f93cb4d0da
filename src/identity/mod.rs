//! Identity collaborator: credential resolution and user profiles.
//!
//! Token issuance lives outside this service. This context only verifies
//! credentials presented with a request and looks up profile data used by
//! notifications and the user-details endpoint:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
