//! Port contracts for the identity collaborator.

mod credentials;
mod directory;

pub use credentials::{IdentityError, IdentityProvider, IdentityResult};
pub use directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
