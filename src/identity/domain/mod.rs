//! Domain model for requester identity.

mod error;
mod ids;
mod profile;
mod role;

pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::UserId;
pub use profile::UserProfile;
pub use role::{Principal, Role};
