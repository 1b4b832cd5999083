//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies that map one-to-one onto a model (`NewUser`, `NewBand`,
//! `NewRehearsal`, `RehearsalUpdate`) are accepted as the model itself.
//! Query strings are taken as raw strings and parsed here so that malformed
//! values produce a JSON `400` instead of a plain-text rejection.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::models::{
    Availability, AttendanceStatus, MemberRole, MembershipStatus, NewPollOption, PollStatus,
    RehearsalFilter, RehearsalStatus, UserId,
};
use crate::scheduler::{RankedSlot, SuggestionParams, Suggestions};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: UserId,
    #[serde(default = "default_role")]
    pub role: MemberRole,
}

fn default_role() -> MemberRole {
    MemberRole::Member
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatusRequest {
    pub status: MembershipStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub title: String,
    pub options: Vec<NewPollOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub availability: Availability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `?status=` on poll listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollListQuery {
    pub status: Option<String>,
}

impl PollListQuery {
    pub fn status(&self) -> Result<Option<PollStatus>, AppError> {
        self.status
            .as_deref()
            .map(|raw| parse_enum("status", raw))
            .transpose()
    }
}

/// `?start=&end=&status=` on rehearsal listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RehearsalListQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub status: Option<String>,
}

impl RehearsalListQuery {
    pub fn to_filter(&self) -> Result<RehearsalFilter, AppError> {
        Ok(RehearsalFilter {
            start: self.start.as_deref().map(|s| parse_datetime("start", s)).transpose()?,
            end: self.end.as_deref().map(|s| parse_datetime("end", s)).transpose()?,
            status: self
                .status
                .as_deref()
                .map(|s| parse_enum::<RehearsalStatus>("status", s))
                .transpose()?,
        })
    }
}

/// Query of `GET /api/rehearsals/suggested-times/{bandId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTimesQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub duration: Option<String>,
    pub min_attendees: Option<String>,
}

impl SuggestedTimesQuery {
    /// `startDate` and `endDate` are required; `duration` and `minAttendees` are integers.
    pub fn to_params(&self) -> Result<SuggestionParams, AppError> {
        let start = required(&self.start_date, "startDate")?;
        let end = required(&self.end_date, "endDate")?;
        let mut params =
            SuggestionParams::new(parse_datetime("startDate", start)?, parse_datetime("endDate", end)?);
        if let Some(raw) = &self.duration {
            params = params.with_duration_minutes(parse_integer("duration", raw)?);
        }
        if let Some(raw) = &self.min_attendees {
            params = params.with_min_attendees(parse_integer("minAttendees", raw)?);
        }
        Ok(params)
    }
}

/// Body of a successful suggested-times response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTimesResponse {
    pub suggested_slots: Vec<RankedSlot>,
    pub total_members: usize,
    pub min_attendees: usize,
    /// Minutes
    pub requested_duration: i64,
}

impl From<Suggestions> for SuggestedTimesResponse {
    fn from(s: Suggestions) -> Self {
        Self {
            suggested_slots: s.slots,
            total_members: s.total_members,
            min_attendees: s.min_attendees,
            requested_duration: s.requested_duration_minutes,
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::bad_request(format!("query parameter '{}' is required", name)))
}

fn parse_integer(name: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::bad_request(format!("'{}' must be an integer, got '{}'", name, raw))
    })
}

/// Accepts RFC 3339 (`2024-03-04T18:00:00Z`), a naive date-time taken as
/// UTC (`2024-03-04T18:00:00`, `2024-03-04T18:00`) or a bare date at
/// midnight UTC.
pub fn parse_datetime(name: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(AppError::bad_request(format!(
        "'{}' is not a valid date-time: '{}'",
        name, raw
    )))
}

fn parse_enum<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_uppercase()))
        .map_err(|_| AppError::bad_request(format!("invalid {} '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query(start: &str, end: &str) -> SuggestedTimesQuery {
        SuggestedTimesQuery {
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap();
        assert_eq!(parse_datetime("d", "2024-03-04T18:00:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("d", "2024-03-04T19:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_datetime("d", "2024-03-04T18:00:00").unwrap(), expected);
        assert_eq!(parse_datetime("d", "2024-03-04T18:00").unwrap(), expected);
        assert_eq!(
            parse_datetime("d", "2024-03-04").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
        );
        assert!(parse_datetime("d", "next tuesday").is_err());
    }

    #[test]
    fn test_suggested_times_query_defaults() {
        let params = query("2024-03-01", "2024-03-31").to_params().unwrap();
        assert_eq!(params.duration_minutes, None);
        assert_eq!(params.min_attendees, None);
    }

    #[test]
    fn test_suggested_times_query_requires_dates() {
        let q = SuggestedTimesQuery {
            start_date: Some("2024-03-01".into()),
            ..Default::default()
        };
        assert!(q.to_params().is_err());
    }

    #[test]
    fn test_suggested_times_query_rejects_non_integers() {
        let mut q = query("2024-03-01", "2024-03-31");
        q.duration = Some("two hours".into());
        assert!(q.to_params().is_err());

        let mut q = query("2024-03-01", "2024-03-31");
        q.min_attendees = Some("-1".into());
        // Parsed here, rejected by the engine.
        assert_eq!(q.to_params().unwrap().min_attendees, Some(-1));
    }

    #[test]
    fn test_status_queries_are_case_insensitive() {
        let q = PollListQuery {
            status: Some("open".into()),
        };
        assert_eq!(q.status().unwrap(), Some(PollStatus::Open));

        let q = RehearsalListQuery {
            status: Some("bogus".into()),
            ..Default::default()
        };
        assert!(q.to_filter().is_err());
    }
}
