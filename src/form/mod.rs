pub mod submission;
pub mod export;

pub use submission::{validate_create, validate_vote, Ballot, CreateMeetingRequest, NewMeeting, VoteRequest};
pub use export::export_results_to_csv;
