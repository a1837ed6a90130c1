pub mod common;
pub mod drift;
pub mod generator_spec;
pub mod project;
pub mod render_context;
pub mod report;
pub mod source_file;
