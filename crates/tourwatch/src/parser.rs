use crate::types::TimesEntry;

/// Seats per tour as assumed by the booking widget's own client-side script.
/// Not published by the site; do not change without checking the widget again.
pub const TOUR_CAPACITY: i64 = 25;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid JSON in times listing: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid ticket count: {0:?}")]
    InvalidTicketCount(String),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
}

pub fn parse_times(body: &str) -> Result<Vec<TimesEntry>, ParseError> {
    Ok(serde_json::from_str(body)?)
}

pub fn parse_ticket_response(body: &str) -> Result<i64, ParseError> {
    let trimmed = body.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidTicketCount(trimmed.to_string()))
}

/// The site answers with the number of reservations, not free seats.
/// Non-positive answers mean "not bookable" and are passed through as-is.
pub fn remaining_tickets(raw: i64) -> i64 {
    if raw > 0 {
        (TOUR_CAPACITY - raw).max(0)
    } else {
        raw
    }
}

/// `MM/DD/YYYY` -> `YYYY-MM-DD`. Parts are reordered verbatim, not validated
/// as a calendar date.
pub fn normalize_date(date: &str) -> Result<String, ParseError> {
    match date.split('/').collect::<Vec<_>>().as_slice() {
        [month, day, year] => Ok(format!("{year}-{month}-{day}")),
        _ => Err(ParseError::DateParseError(format!(
            "{date}: expected month/day/year"
        ))),
    }
}

pub fn slot_key(date: &str, time: &str) -> Result<String, ParseError> {
    Ok(format!("{} {}", normalize_date(date)?, time))
}
