//! In-memory report store for testing.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use regen_core::{
    application::{ApplicationError, ports::ReportStore},
    domain::Report,
    error::RegenResult,
};

#[derive(Debug, Clone, Default)]
pub struct InMemoryReportStore {
    inner: Arc<RwLock<HashMap<String, Report>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved reports.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportStore for InMemoryReportStore {
    fn load(&self, generator: &str) -> RegenResult<Option<Report>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(generator).cloned())
    }

    fn save(&self, generator: &str, report: &Report) -> RegenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(generator.to_string(), report.clone());
        Ok(())
    }
}
