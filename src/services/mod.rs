//! External service interactions
//!
//! - `store` - document store trait and the JSON file store
//! - `issues` - issue document mapping and the background loader
//! - `identity` - sign-in / sign-out and session persistence

pub mod identity;
pub mod issues;
pub mod store;

pub use identity::{IdentityProvider, LocalIdentity, User};
pub use issues::{add_issue, IssueLoader};
pub use store::{DocumentStore, JsonFileStore};
