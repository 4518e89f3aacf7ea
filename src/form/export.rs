use chrono_tz::Tz;
use csv::Writer;

use crate::display::format_local;
use crate::schedule::tally::percentage;
use crate::schedule::{Meeting, VoteSummary};

pub const RESULTS_CSV_HEADER: [&str; 5] = ["slot", "local_time", "votes", "percentage", "voters"];

/// Writes the vote summary as CSV, one row per slot in summary order
///
/// # Arguments
/// * `meeting` - Meeting the summary was computed from (for participant count)
/// * `rows` - Output of `tally::summary`
/// * `tz` - Reference timezone for the `local_time` column
pub fn export_results_to_csv(
    meeting: &Meeting,
    rows: &[VoteSummary],
    tz: Tz,
) -> Result<Vec<u8>, csv::Error> {
    let participants = meeting.participant_count();
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(RESULTS_CSV_HEADER)?;

    for row in rows {
        wtr.write_record([
            row.slot.to_string(),
            format_local(&row.slot, tz),
            row.votes.to_string(),
            percentage(row.votes, participants).to_string(),
            row.voters.join("; "),
        ])?;
    }

    wtr.flush()?;
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}
