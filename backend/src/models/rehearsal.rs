use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BandId, PollId, RehearsalId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RehearsalStatus {
    Scheduled,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Attending,
    Maybe,
    NotAttending,
    NoResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub user_id: UserId,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<DateTime<Utc>>,
}

impl Attendance {
    /// Placeholder row created for every active member when a rehearsal is scheduled.
    pub fn pending(user_id: UserId) -> Self {
        Self {
            user_id,
            status: AttendanceStatus::NoResponse,
            notes: None,
            response_time: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

/// A daily time range written as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayRange {
    pub start_time: String,
    pub end_time: String,
}

/// How a recurring rehearsal repeats. Stored with the rehearsal; occurrences
/// are not generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPattern {
    pub frequency: RecurrenceFrequency,
    /// 0 = Sunday .. 6 = Saturday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub times_of_day: Vec<TimeOfDayRange>,
}

impl RecurringPattern {
    /// Check field ranges; the error names the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.day_of_week.is_some_and(|d| d > 6) {
            return Err("dayOfWeek must be between 0 and 6".to_string());
        }
        if self.day_of_month.is_some_and(|d| !(1..=31).contains(&d)) {
            return Err("dayOfMonth must be between 1 and 31".to_string());
        }
        if self.end_date.is_some_and(|end| end < self.start_date) {
            return Err("endDate must not precede startDate".to_string());
        }
        for range in &self.times_of_day {
            let start = parse_time_of_day(&range.start_time)?;
            let end = parse_time_of_day(&range.end_time)?;
            if start >= end {
                return Err(format!(
                    "time range {}-{} must start before it ends",
                    range.start_time, range.end_time
                ));
            }
        }
        Ok(())
    }
}

fn parse_time_of_day(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| format!("'{}' is not a HH:MM time", value))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rehearsal {
    pub id: RehearsalId,
    pub band_id: BandId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: RehearsalStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_id: Option<PollId>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<RecurringPattern>,
    #[serde(default)]
    pub attendance: Vec<Attendance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRehearsal {
    pub band_id: BandId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Poll this rehearsal was scheduled from; it is closed on creation.
    #[serde(default)]
    pub poll_id: Option<PollId>,
    #[serde(default)]
    pub is_recurring: bool,
    /// Required when `is_recurring`; dropped otherwise.
    #[serde(default)]
    pub recurring_pattern: Option<RecurringPattern>,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RehearsalUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<RehearsalStatus>,
}

/// Listing filter. The time bounds apply only when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RehearsalFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub status: Option<RehearsalStatus>,
}

impl RehearsalFilter {
    pub fn matches(&self, rehearsal: &Rehearsal) -> bool {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if rehearsal.start_time < start || rehearsal.end_time > end {
                return false;
            }
        }
        self.status.map_or(true, |s| s == rehearsal.status)
    }
}
