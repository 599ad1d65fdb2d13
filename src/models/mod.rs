//! Data models for the fleet platform API

mod envelope;
mod id;
mod lookup;
mod org;
mod user;

pub use envelope::ApiEnvelope;
pub use lookup::{Area, AreaQuery, Company, NewRole, Role};
pub use org::OrgNode;
pub use user::{DATE_FORMAT, NewUser, UserPage, UserPageQuery, UserRow};
