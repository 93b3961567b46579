//! Player configuration: schema types and loading.
//!
//! The config file is normally written by the tag-mapping tool; the player
//! only reads it, once, at startup.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;

#[cfg(test)]
mod tests;
