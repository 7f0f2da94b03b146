use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::destination::DestinationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Planned,
    Booked,
    Completed,
    Cancelled,
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TripStatus::Planned => "planned",
            TripStatus::Booked => "booked",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(TripStatus::Planned),
            "booked" => Ok(TripStatus::Booked),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" | "canceled" => Ok(TripStatus::Cancelled),
            other => Err(format!("unknown trip status `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub destination_id: DestinationId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of create/update requests. The owner comes from the request context,
/// never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct TripInput {
    pub destination_id: DestinationId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Trip {
    pub fn from_input(user_id: &str, input: TripInput) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            user_id: user_id.to_string(),
            destination_id: input.destination_id,
            name: input.name.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Overwrite the editable fields, keeping identity and creation time.
    pub fn apply(&mut self, input: TripInput) {
        self.destination_id = input.destination_id;
        self.name = input.name.trim().to_string();
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.status = input.status;
        self.notes = input.notes.filter(|n| !n.trim().is_empty());
        self.updated_at = Some(Utc::now());
    }
}
