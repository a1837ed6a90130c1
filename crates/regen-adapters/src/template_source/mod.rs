//! Template source adapters.

mod directory;
mod memory;

pub use directory::DirectoryTemplateSource;
pub use memory::InMemoryTemplateSource;
