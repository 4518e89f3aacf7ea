use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{error, info, warn};
use serde::Serialize;

use crate::code::{normalize_code, CodeGenerator};
use crate::config::Config;
use crate::errors::AppError;
use crate::form::{export_results_to_csv, validate_create, validate_vote, Ballot, CreateMeetingRequest, VoteRequest};
use crate::schedule::{best_slots, generate_slots, summary, BestSlot, Meeting, Participant, Slot, VoteSummary};
use crate::store::{MeetingStore, StoreError};

/// Tunables the service needs from configuration
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub timezone: Tz,
    pub max_code_attempts: usize,
    pub max_dates: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            timezone: chrono_tz::America::Los_Angeles,
            max_code_attempts: 16,
            max_dates: 62,
        }
    }
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        ServiceSettings {
            timezone: config.timezone,
            max_code_attempts: config.max_code_attempts,
            max_dates: config.max_dates,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedMeeting {
    pub code: String,
    pub meeting: Meeting,
}

/// State after a ballot, with best slots recomputed from it
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub meeting: Meeting,
    pub best_slots: Vec<BestSlot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResults {
    pub meeting: Meeting,
    pub best_slots: Vec<BestSlot>,
    pub votes_summary: Vec<VoteSummary>,
}

/// Counts from applying one ballot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BallotStats {
    accepted: usize,
    ignored: usize,
    first_ballot: bool,
}

/// One mutex per meeting code. Writers for the same code run one at a time;
/// writers for different codes never contend. An entry lives only while some
/// caller holds its handle, so the map stays as small as the set of codes
/// currently being written.
#[derive(Debug, Default)]
struct CodeLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CodeLocks {
    fn handle(&self, code: &str) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut locks = self.locks.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(locks.entry(code.to_string()).or_default().clone())
    }

    /// Drops the entry for `code` when `handle` and the map are its only owners.
    /// Handles are only cloned under the map lock, so the count cannot grow here.
    fn release(&self, code: &str, handle: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        if Arc::strong_count(&handle) == 2 {
            locks.remove(code);
        }
    }

    /// Runs `f` while holding the lock for `code`
    fn with_lock<T>(
        &self,
        code: &str,
        f: impl FnOnce() -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let handle = self.handle(code)?;
        let result = match handle.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(StoreError::Poisoned.into()),
        };
        self.release(code, handle);
        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}

/// Replace-then-add: drop every earlier vote by this name, then record the
/// new ballot. Entries that are not slots of this meeting are skipped.
fn apply_ballot(meeting: &mut Meeting, ballot: &Ballot, now: DateTime<Utc>) -> BallotStats {
    let name = &ballot.participant_name;

    let first_ballot = meeting.participant(name).is_none();
    if first_ballot {
        meeting.participants.push(Participant {
            name: name.clone(),
            joined_at: now,
        });
    }

    for voters in meeting.votes.values_mut() {
        voters.retain(|voter| voter != name);
    }

    let mut seen = BTreeSet::new();
    let mut accepted = 0;
    let mut ignored = 0;
    for raw in &ballot.slots {
        let Some(slot) = Slot::parse(raw) else {
            ignored += 1;
            continue;
        };
        if !seen.insert(slot) {
            continue;
        }
        match meeting.votes.get_mut(&slot) {
            Some(voters) => {
                voters.push(name.clone());
                accepted += 1;
            }
            None => ignored += 1,
        }
    }

    BallotStats {
        accepted,
        ignored,
        first_ballot,
    }
}

/// Orchestrates meeting creation, voting and results over a pluggable store
pub struct MeetingService {
    store: Arc<dyn MeetingStore>,
    codes: Box<dyn CodeGenerator>,
    settings: ServiceSettings,
    locks: CodeLocks,
}

impl MeetingService {
    pub fn new(
        store: Arc<dyn MeetingStore>,
        codes: Box<dyn CodeGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        MeetingService {
            store,
            codes,
            settings,
            locks: CodeLocks::default(),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.settings.timezone
    }

    pub fn create_meeting(&self, req: CreateMeetingRequest) -> Result<CreatedMeeting, AppError> {
        let new = validate_create(req, self.settings.max_dates)?;
        let slots = generate_slots(&new.dates, &new.start_time, &new.end_time, self.settings.timezone)?;

        for attempt in 1..=self.settings.max_code_attempts {
            let code = normalize_code(&self.codes.next_code());
            let created = self.locks.with_lock(&code, || {
                if self.store.get(&code)?.is_some() {
                    warn!("Meeting code {} already taken (attempt {})", code, attempt);
                    return Ok(None);
                }
                let meeting = Meeting::new(
                    code.clone(),
                    new.name.clone(),
                    new.creator_name.clone(),
                    slots.clone(),
                    Utc::now(),
                );
                self.store.put(&code, &meeting)?;
                Ok(Some(meeting))
            })?;
            if let Some(meeting) = created {
                info!("Created meeting {} with {} slots", code, meeting.time_slots.len());
                return Ok(CreatedMeeting { code, meeting });
            }
        }

        error!(
            "Could not find a free meeting code after {} attempts",
            self.settings.max_code_attempts
        );
        Err(AppError::CodeSpaceExhausted {
            attempts: self.settings.max_code_attempts,
        })
    }

    pub fn get_meeting(&self, code: &str) -> Result<Meeting, AppError> {
        self.store
            .get(&normalize_code(code))?
            .ok_or(AppError::NotFound)
    }

    /// Records a participant's ballot, replacing any earlier one under the same name.
    /// Nothing is persisted unless the whole ballot applies.
    pub fn submit_vote(&self, code: &str, req: VoteRequest) -> Result<VoteOutcome, AppError> {
        let ballot = validate_vote(req)?;
        let code = normalize_code(code);

        let (meeting, stats) = self.locks.with_lock(&code, || {
            let mut meeting = self.store.get(&code)?.ok_or(AppError::NotFound)?;
            let stats = apply_ballot(&mut meeting, &ballot, Utc::now());
            self.store.put(&code, &meeting)?;
            Ok((meeting, stats))
        })?;

        info!(
            "Ballot from '{}' on {}: {} slots accepted, {} ignored{}",
            ballot.participant_name,
            code,
            stats.accepted,
            stats.ignored,
            if stats.first_ballot { " (new participant)" } else { "" }
        );

        let best_slots = best_slots(&meeting);
        Ok(VoteOutcome { meeting, best_slots })
    }

    pub fn get_results(&self, code: &str) -> Result<MeetingResults, AppError> {
        let meeting = self.get_meeting(code)?;
        Ok(MeetingResults {
            best_slots: best_slots(&meeting),
            votes_summary: summary(&meeting),
            meeting,
        })
    }

    /// Vote summary as CSV bytes
    pub fn export_results(&self, code: &str) -> Result<Vec<u8>, AppError> {
        let results = self.get_results(code)?;
        Ok(export_results_to_csv(
            &results.meeting,
            &results.votes_summary,
            self.settings.timezone,
        )?)
    }

    pub fn list_meetings(&self) -> Result<Vec<Meeting>, AppError> {
        Ok(self.store.list()?)
    }
}
