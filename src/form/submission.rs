use serde::Deserialize;

use crate::errors::AppError;

/// Body of a create-meeting request as it arrives from the frontend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    pub name: Option<String>,
    pub creator_name: Option<String>,
    pub dates: Option<Vec<String>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Body of a vote request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub participant_name: Option<String>,
    pub available_slots: Option<Vec<String>>,
}

/// A create request with every required field present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeeting {
    pub name: String,
    pub creator_name: String,
    pub dates: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

/// One participant's full set of available slots, still as submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub participant_name: String,
    pub slots: Vec<String>,
}

fn required_text(field: &'static str, label: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::validation(field, format!("{label} is required"))),
    }
}

/// Validates a create request. Time and date formats are checked later by
/// slot generation; here we only require presence.
pub fn validate_create(req: CreateMeetingRequest, max_dates: usize) -> Result<NewMeeting, AppError> {
    let name = required_text("name", "Meeting name", req.name)?;
    let creator_name = required_text("creatorName", "Creator name", req.creator_name)?;

    let dates = req.dates.unwrap_or_default();
    if dates.is_empty() {
        return Err(AppError::validation("dates", "At least one date is required"));
    }
    if dates.len() > max_dates {
        return Err(AppError::validation(
            "dates",
            format!("At most {max_dates} dates may be proposed"),
        ));
    }

    let start_time = required_text("startTime", "Start time", req.start_time)?;
    let end_time = required_text("endTime", "End time", req.end_time)?;

    Ok(NewMeeting {
        name,
        creator_name,
        dates,
        start_time,
        end_time,
    })
}

/// Validates a vote request. An empty slot list is a valid ballot: the
/// participant is available for nothing.
pub fn validate_vote(req: VoteRequest) -> Result<Ballot, AppError> {
    let participant_name = required_text("participantName", "Participant name", req.participant_name)?;
    let slots = req
        .available_slots
        .ok_or_else(|| AppError::validation("availableSlots", "Available slots are required"))?;
    Ok(Ballot {
        participant_name,
        slots,
    })
}
