use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Formats an instant the way every slot and timestamp goes over the wire:
/// RFC 3339 in UTC, millisecond precision, `Z` suffix.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One half-hour candidate instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(DateTime<Utc>);

impl Slot {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Slot(instant)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Accepts any RFC 3339 spelling of the instant, so `...16:00:00Z` and
    /// `...09:00:00.000-07:00` name the same slot.
    pub fn parse(value: &str) -> Option<Slot> {
        value.parse().ok()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_instant(&self.0))
    }
}

impl FromStr for Slot {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s.trim()).map(|dt| Slot(dt.with_timezone(&Utc)))
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter keeping timestamps in the same format as slots
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_instant(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// A voter within one meeting, identified by exact name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    #[serde(with = "timestamp")]
    pub joined_at: DateTime<Utc>,
}

/// One scheduling poll. The ledger (`votes`) holds exactly one entry per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(rename = "id")]
    pub code: String,
    pub name: String,
    pub creator_name: String,
    pub time_slots: Vec<Slot>,
    pub participants: Vec<Participant>,
    pub votes: BTreeMap<Slot, Vec<String>>, // slot -> voter names
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    /// Builds a meeting with an empty voter list for every slot
    pub fn new(
        code: String,
        name: String,
        creator_name: String,
        time_slots: Vec<Slot>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let votes = time_slots.iter().map(|slot| (*slot, Vec::new())).collect();
        Meeting {
            code,
            name,
            creator_name,
            time_slots,
            participants: Vec::new(),
            votes,
            created_at,
        }
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn voters(&self, slot: &Slot) -> Option<&[String]> {
        self.votes.get(slot).map(Vec::as_slice)
    }
}

/// A slot tied for the highest nonzero vote count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestSlot {
    pub slot: Slot,
    pub votes: usize,
    pub percentage: u32,
}

/// Per-slot tally for the results view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteSummary {
    pub slot: Slot,
    pub votes: usize,
    pub voters: Vec<String>,
}
