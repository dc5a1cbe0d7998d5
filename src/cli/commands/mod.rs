//! CLI command implementations

pub mod config;
pub mod delete;
pub mod list;
pub mod put;
pub mod values;
pub mod versions;

pub use config::execute as config;
pub use delete::execute as delete;
pub use list::execute as list;
pub use put::execute as put;
pub use values::execute as values;
pub use versions::execute as versions;
