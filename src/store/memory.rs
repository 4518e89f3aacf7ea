use std::collections::HashMap;
use std::sync::RwLock;

use crate::schedule::Meeting;
use super::{MeetingStore, StoreError};

/// Volatile store; contents live as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    meetings: RwLock<HashMap<String, Meeting>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeetingStore for MemoryStore {
    fn get(&self, code: &str) -> Result<Option<Meeting>, StoreError> {
        let meetings = self.meetings.read().map_err(|_| StoreError::Poisoned)?;
        Ok(meetings.get(code).cloned())
    }

    fn put(&self, code: &str, meeting: &Meeting) -> Result<(), StoreError> {
        let mut meetings = self.meetings.write().map_err(|_| StoreError::Poisoned)?;
        meetings.insert(code.to_string(), meeting.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Meeting>, StoreError> {
        let meetings = self.meetings.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<Meeting> = meetings.values().cloned().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(all)
    }
}
