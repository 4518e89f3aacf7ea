//! Shared fixtures for service and HTTP tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use meetsync::code::CodeGenerator;
use meetsync::form::{CreateMeetingRequest, VoteRequest};
use meetsync::service::{MeetingService, ServiceSettings};
use meetsync::schedule::Meeting;
use meetsync::store::{JsonDirStore, MeetingStore, MemoryStore, StoreError};
use meetsync::web::AppState;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const DATE: &str = "2025-09-25";
/// 09:00, 09:30 and 10:00 on DATE in Los Angeles
pub const SLOT_0900: &str = "2025-09-25T16:00:00.000Z";
pub const SLOT_0930: &str = "2025-09-25T16:30:00.000Z";
pub const SLOT_1000: &str = "2025-09-25T17:00:00.000Z";

// ============================================================================
// CODE GENERATORS
// ============================================================================

/// Hands out a fixed list of codes, then repeats the last one forever
pub struct ScriptedCodes {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedCodes {
    pub fn new(codes: &[&str]) -> Self {
        ScriptedCodes {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().map(|c| c.to_string()).unwrap_or_default()),
        }
    }
}

impl CodeGenerator for ScriptedCodes {
    fn next_code(&self) -> String {
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => {
                *self.last.lock().unwrap() = code.clone();
                code
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}

// ============================================================================
// STORES
// ============================================================================

/// In-memory store whose writes start failing once `fail_puts` is called
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FailingStore {
    pub fn fail_puts(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl MeetingStore for FailingStore {
    fn get(&self, code: &str) -> Result<Option<Meeting>, StoreError> {
        self.inner.get(code)
    }

    fn put(&self, code: &str, meeting: &Meeting) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("disk full")));
        }
        self.inner.put(code, meeting)
    }

    fn list(&self) -> Result<Vec<Meeting>, StoreError> {
        self.inner.list()
    }
}

// ============================================================================
// SETUP
// ============================================================================

/// Service over a fresh in-memory store with the given code script
pub fn service_with_codes(codes: &[&str]) -> (Arc<MemoryStore>, MeetingService) {
    let store = Arc::new(MemoryStore::new());
    let service = MeetingService::new(
        store.clone(),
        Box::new(ScriptedCodes::new(codes)),
        ServiceSettings::default(),
    );
    (store, service)
}

/// Service over a store that can be told to reject writes
pub fn service_with_failing_store(codes: &[&str]) -> (Arc<FailingStore>, MeetingService) {
    let store = Arc::new(FailingStore::default());
    let service = MeetingService::new(
        store.clone(),
        Box::new(ScriptedCodes::new(codes)),
        ServiceSettings::default(),
    );
    (store, service)
}

pub fn app_state(codes: &[&str], expose_index: bool) -> AppState {
    let (_, service) = service_with_codes(codes);
    AppState {
        service,
        expose_index,
    }
}

/// App state persisting meetings as JSON files under `dir`
pub fn app_state_on_disk(dir: &Path, codes: &[&str]) -> AppState {
    let store = Arc::new(JsonDirStore::open(dir).expect("open store"));
    AppState {
        service: MeetingService::new(store, Box::new(ScriptedCodes::new(codes)), ServiceSettings::default()),
        expose_index: false,
    }
}

pub fn create_request(name: &str, dates: &[&str], start: &str, end: &str) -> CreateMeetingRequest {
    CreateMeetingRequest {
        name: Some(name.to_string()),
        creator_name: Some("Ada".to_string()),
        dates: Some(dates.iter().map(|d| d.to_string()).collect()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
    }
}

pub fn vote_request(name: &str, slots: &[&str]) -> VoteRequest {
    VoteRequest {
        participant_name: Some(name.to_string()),
        available_slots: Some(slots.iter().map(|s| s.to_string()).collect()),
    }
}
