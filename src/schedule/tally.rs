use super::types::{BestSlot, Meeting, VoteSummary};

/// Share of participants who picked a slot, as a whole percent.
/// Rounds half away from zero in integer arithmetic; 0 when nobody has voted.
pub fn percentage(count: usize, participants: usize) -> u32 {
    if participants == 0 {
        return 0;
    }
    ((200 * count + participants) / (2 * participants)) as u32
}

/// Every slot holding the maximum vote count, in chronological order.
/// Empty when nobody has voted or every slot has zero votes.
pub fn best_slots(meeting: &Meeting) -> Vec<BestSlot> {
    let participants = meeting.participant_count();
    if participants == 0 {
        return Vec::new();
    }

    let max_votes = meeting.votes.values().map(Vec::len).max().unwrap_or(0);
    if max_votes == 0 {
        return Vec::new();
    }

    meeting
        .votes
        .iter()
        .filter(|(_, voters)| voters.len() == max_votes)
        .map(|(slot, voters)| BestSlot {
            slot: *slot,
            votes: voters.len(),
            percentage: percentage(voters.len(), participants),
        })
        .collect()
}

/// Tally for every slot, zero-vote slots included.
/// Highest count first; equal counts stay in chronological order.
pub fn summary(meeting: &Meeting) -> Vec<VoteSummary> {
    let mut rows: Vec<VoteSummary> = meeting
        .votes
        .iter()
        .map(|(slot, voters)| VoteSummary {
            slot: *slot,
            votes: voters.len(),
            voters: voters.clone(),
        })
        .collect();
    // sort_by is stable, so ties keep ledger order
    rows.sort_by(|a, b| b.votes.cmp(&a.votes));
    rows
}
