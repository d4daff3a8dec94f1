use crate::domain::ports::{ResultStore, StoredReport};
use crate::domain::progress::ProgressReport;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local store keyed by session id.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    entries: RwLock<HashMap<String, StoredReport>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultStore for InMemoryResultStore {
    fn put(&self, session: &str, report: ProgressReport) -> StoredReport {
        let stored = StoredReport {
            report,
            stored_at: Utc::now(),
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(session.to_string(), stored.clone());
        stored
    }

    fn get(&self, session: &str) -> Option<StoredReport> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(session).cloned()
    }

    fn invalidate(&self, session: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(session).is_some()
    }

    fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}
