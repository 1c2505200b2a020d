//! CLI command implementations

pub mod install;
pub mod stacks;
pub mod version;
