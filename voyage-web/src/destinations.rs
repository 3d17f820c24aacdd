//! Travel destinations owned by individual users
//!
//! Every read and write goes through [`DestinationService`], which only lets
//! callers see their own records. A record owned by someone else looks
//! exactly like one that does not exist.

pub mod database;
pub mod handlers;
pub mod service;
pub mod store;

pub use service::DestinationService;
pub use store::DestinationStore;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use voyage_core::{validation_error, VoyageResult};

/// A stored destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: i64,
    /// User who created the record. Never changes.
    pub owner_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub travel_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /destinations`
///
/// There is deliberately no owner field: the owner is always the caller.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestination {
    #[schema(example = "Kyoto")]
    pub name: String,
    pub location: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[schema(example = "2025-06-01")]
    pub travel_date: String,
    pub notes: Option<String>,
}

/// Body of `PATCH /destinations/{id}`
///
/// Each field is `None` when the key is absent and `Some(None)` when it is
/// sent as `null`. Absent fields are left alone; a `null` clears `location`
/// or `notes` and is rejected for `name` and `travelDate`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPatch {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, required = false)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, required = false)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, required = false)]
    pub travel_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, required = false)]
    pub notes: Option<Option<String>>,
}

/// A key that is present, even as `null`, deserializes to `Some`
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Validated input for a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDestination {
    pub owner_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub travel_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Validated field changes for an existing record
///
/// `Some(None)` on an optional column clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationChanges {
    pub name: Option<String>,
    pub location: Option<Option<String>>,
    pub travel_date: Option<DateTime<Utc>>,
    pub notes: Option<Option<String>>,
}

impl NewDestination {
    pub fn from_request(owner_id: i64, input: CreateDestination) -> VoyageResult<Self> {
        Ok(Self {
            owner_id,
            name: validate_name(input.name)?,
            location: input.location,
            travel_date: parse_travel_date(&input.travel_date)?,
            notes: input.notes,
        })
    }
}

impl DestinationChanges {
    pub fn from_patch(patch: DestinationPatch) -> VoyageResult<Self> {
        let name = match patch.name {
            Some(name) => Some(validate_name(not_null(name, "name")?)?),
            None => None,
        };
        let travel_date = match patch.travel_date {
            Some(date) => Some(parse_travel_date(&not_null(date, "travelDate")?)?),
            None => None,
        };

        Ok(Self {
            name,
            location: patch.location,
            travel_date,
            notes: patch.notes,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.travel_date.is_none()
            && self.notes.is_none()
    }

    /// Overwrite the fields that are present, leaving the rest untouched
    pub fn apply_to(&self, destination: &mut Destination) {
        if let Some(name) = &self.name {
            destination.name = name.clone();
        }
        if let Some(location) = &self.location {
            destination.location = location.clone();
        }
        if let Some(travel_date) = self.travel_date {
            destination.travel_date = travel_date;
        }
        if let Some(notes) = &self.notes {
            destination.notes = notes.clone();
        }
    }
}

fn not_null(value: Option<String>, field: &str) -> VoyageResult<String> {
    value.ok_or_else(|| validation_error!(format!("{field} must not be null"), field))
}

fn validate_name(name: String) -> VoyageResult<String> {
    if name.trim().is_empty() {
        return Err(validation_error!("name must not be empty", "name"));
    }
    Ok(name)
}

/// Parse a client-supplied travel date.
///
/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which is
/// taken as midnight UTC.
pub fn parse_travel_date(input: &str) -> VoyageResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| {
            validation_error!(
                format!("Invalid travelDate '{input}': expected YYYY-MM-DD or an RFC 3339 timestamp"),
                "travelDate"
            )
        })
}
