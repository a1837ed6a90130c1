//! Report store adapters.

mod memory;
mod yaml;

pub use memory::InMemoryReportStore;
pub use yaml::{REPORT_DIR, YamlReportStore};
