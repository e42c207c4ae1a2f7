//! Resource variants for Platform API entities.

mod activity;
mod domain;
mod environment;
mod project;
mod ssh_key;

pub use activity::*;
pub use domain::*;
pub use environment::*;
pub use project::*;
pub use ssh_key::*;
