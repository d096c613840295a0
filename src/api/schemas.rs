//! Request and response schemas for the HTTP API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of a plan-generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelRequest {
    /// Where the trip starts
    pub departure: String,
    /// Where the trip goes
    pub destination: String,
    /// First day of the trip, YYYY-MM-DD
    pub start_date: String,
    /// Last day of the trip, YYYY-MM-DD
    pub end_date: String,
    /// Interest keywords steering the plan
    #[serde(default)]
    pub interests: Vec<String>,
    /// Prefer less crowded places
    #[serde(default)]
    pub avoid_crowds: bool,
    /// Accepted for compatibility; currently unused
    #[serde(default)]
    pub team_outing: bool,
}

impl TravelRequest {
    /// Validate the request, returning the trip length in days
    pub fn validate(&self) -> Result<i64, String> {
        if self.departure.trim().is_empty() || self.destination.trim().is_empty() {
            return Err("Departure and destination must not be empty".to_string());
        }

        let start = NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d")
            .map_err(|_| "start_date must be in YYYY-MM-DD format".to_string())?;
        let end = NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d")
            .map_err(|_| "end_date must be in YYYY-MM-DD format".to_string())?;

        if end < start {
            return Err("end_date must not be before start_date".to_string());
        }

        Ok((end - start).num_days() + 1)
    }
}

/// Body of a chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-text user message
    pub message: String,
}
