pub mod memory;
pub mod json_dir;

use thiserror::Error;

use crate::schedule::Meeting;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("lock poisoned")]
    Poisoned,
    #[error("invalid meeting key '{0}'")]
    InvalidKey(String),
}

/// Key-value home of meetings. Keys are used exactly as given;
/// case folding happens before the store is reached.
pub trait MeetingStore: Send + Sync {
    fn get(&self, code: &str) -> Result<Option<Meeting>, StoreError>;

    fn put(&self, code: &str, meeting: &Meeting) -> Result<(), StoreError>;

    /// All meetings, ordered by code
    fn list(&self) -> Result<Vec<Meeting>, StoreError>;
}
