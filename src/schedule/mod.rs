pub mod types;
pub mod slot_utils;
pub mod tally;

pub use types::{BestSlot, Meeting, Participant, Slot, VoteSummary};
pub use slot_utils::generate_slots;
pub use tally::{best_slots, summary};
