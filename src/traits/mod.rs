//! Trait definitions for type-level resource operations.
//!
//! Every resource variant implements [`ResourceType`]; each also implements
//! the operation traits its API endpoints support.

mod create;
mod get;
mod list;
mod resource_type;

pub use create::Create;
pub use get::Get;
pub use list::List;
pub use resource_type::ResourceType;
