pub mod catalog;
pub mod types;

pub use catalog::{default_catalog_path, resolve_catalog};
pub use types::{Cli, Commands};
