use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BandId, PollId, PollOptionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Available,
    Maybe,
    Unavailable,
}

/// One member's mark on one poll option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub user_id: UserId,
    pub availability: Availability,
}

/// Candidate interval `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: PollOptionId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub responses: Vec<PollResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPoll {
    pub id: PollId,
    pub band_id: BandId,
    pub title: String,
    pub status: PollStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub options: Vec<PollOption>,
}

impl AvailabilityPoll {
    pub fn is_open(&self) -> bool {
        self.status == PollStatus::Open
    }
}

/// Interval supplied when creating a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPollOption {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoll {
    pub band_id: BandId,
    pub title: String,
    pub created_by: UserId,
    pub options: Vec<NewPollOption>,
}
