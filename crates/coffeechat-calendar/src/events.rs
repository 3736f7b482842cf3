use jiff::civil::{Date, DateTime, Time};
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CalendarError;

/// Zone new events are created in.
pub const EVENT_TIME_ZONE: &str = "America/Chicago";

pub const UNTITLED: &str = "No Title";

pub const DEFAULT_EVENT_LENGTH: SignedDuration = SignedDuration::from_hours(1);

/// An event as shown in the calendar view. `start` and `end` hold either an
/// RFC 3339 date-time or, for all-day events, a bare date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
}

/// An event to insert, in local time for [`EVENT_TIME_ZONE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime,
    pub end: DateTime,
    pub location: Option<String>,
    pub club: Option<String>,
}

impl NewCalendarEvent {
    /// Request body for an events insert.
    pub fn to_insert_body(&self) -> Value {
        json!({
            "summary": self.title,
            "description": self.description,
            "start": { "dateTime": self.start.to_string(), "timeZone": EVENT_TIME_ZONE },
            "end": { "dateTime": self.end.to_string(), "timeZone": EVENT_TIME_ZONE },
            "location": self.location,
        })
    }
}

/// An event published by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubEvent {
    pub event_name: String,
    /// `YYYY-MM-DD`.
    pub event_date: String,
    /// `HH:MM` (24-hour) or `H:MM AM/PM`.
    pub event_time: String,
    pub club_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ClubEvent {
    pub fn to_calendar_event(&self) -> Result<NewCalendarEvent, CalendarError> {
        let date: Date = self.event_date.trim().parse().map_err(|e| {
            CalendarError::InvalidEvent(format!("bad date {:?}: {e}", self.event_date))
        })?;
        let start = date.to_datetime(parse_time(&self.event_time)?);
        let end = start
            .checked_add(DEFAULT_EVENT_LENGTH)
            .map_err(|e| CalendarError::InvalidEvent(e.to_string()))?;

        let description = self
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Event hosted by {}", self.club_name));

        Ok(NewCalendarEvent {
            title: format!("{}: {}", self.club_name, self.event_name),
            description: Some(description),
            start,
            end,
            location: self.location.clone(),
            club: Some(self.club_name.clone()),
        })
    }
}

/// Parse `18:30`, `6:30 PM` or `6:30pm`.
pub fn parse_time(input: &str) -> Result<Time, CalendarError> {
    let invalid = || CalendarError::InvalidEvent(format!("bad time {input:?}"));
    let lower = input.trim().to_ascii_lowercase();

    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Some(true))
    } else {
        (lower.as_str(), None)
    };

    let (hour, minute) = clock.split_once(':').ok_or_else(invalid)?;
    let mut hour: i8 = hour.parse().map_err(|_| invalid())?;
    let minute: i8 = minute.parse().map_err(|_| invalid())?;

    if let Some(pm) = meridiem {
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    Time::new(hour, minute, 0, 0).map_err(|_| invalid())
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventList {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiEvent {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<ApiEventTime>,
    #[serde(default)]
    pub end: Option<ApiEventTime>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEventTime {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ApiEventTime {
    fn into_value(self) -> Option<String> {
        self.date_time.or(self.date)
    }
}

impl From<ApiEvent> for CalendarEvent {
    fn from(event: ApiEvent) -> Self {
        Self {
            id: event.id,
            title: event
                .summary
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            description: event.description,
            start: event.start.and_then(ApiEventTime::into_value),
            end: event.end.and_then(ApiEventTime::into_value),
            location: event.location,
        }
    }
}

/// Parse an events list response.
pub fn parse_event_list(body: &str) -> Result<Vec<CalendarEvent>, serde_json::Error> {
    let list: EventList = serde_json::from_str(body)?;
    Ok(list.items.into_iter().map(CalendarEvent::from).collect())
}

