//! Tour record types.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use time::{Duration, OffsetDateTime};
use utoipa::ToSchema;

/// How long after an update a lookup reports the record as freshly updated.
pub const RECENT_UPDATE_WINDOW: Duration = Duration::seconds(60);

/// Truncate to the millisecond precision timestamps are persisted with.
fn stored_precision(at: OffsetDateTime) -> OffsetDateTime {
    at.replace_nanosecond(u32::from(at.millisecond()) * 1_000_000)
        .unwrap_or(at)
}

/// System-generated identity of a stored tour (the `_id` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generate a fresh identity.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// The underlying ObjectId.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for RecordId {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Unit the tour duration is expressed in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DurationUnit {
    /// Multi-day tours.
    Days,
    /// Tours shorter than a day.
    Hours,
    /// Multi-week tours.
    Weeks,
}

impl DurationUnit {
    /// Accepted spellings, for error messages.
    pub fn allowed() -> String {
        Self::iter()
            .map(|unit| unit.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A persisted tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tour {
    /// Record identity.
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "665f1c2e9b1d8c0a12345678")]
    pub id: RecordId,
    /// User-supplied unique number.
    #[schema(example = 7)]
    pub tour_id: i64,
    /// Display title.
    #[schema(example = "Old Town Walk")]
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Where guests are collected.
    pub pick_up: String,
    /// Where the group gathers.
    pub meeting_point: String,
    /// Where guests are dropped.
    pub drop_off: String,
    /// Length, in `duration_unit`s.
    #[schema(example = 3)]
    pub duration: i64,
    /// Unit of `duration`.
    pub duration_unit: DurationUnit,
    /// Creation time.
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    /// Last modification time.
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl Tour {
    /// Build a new record from validated input, stamping both timestamps.
    pub fn create(new: NewTour, now: OffsetDateTime) -> Self {
        let now = stored_precision(now);
        Self {
            id: RecordId::generate(),
            tour_id: new.tour_id,
            title: new.title,
            description: new.description,
            pick_up: new.pick_up,
            meeting_point: new.meeting_point,
            drop_off: new.drop_off,
            duration: new.duration,
            duration_unit: new.duration_unit,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overlay the fields present in `patch` and refresh `updated_at`.
    pub fn apply(&mut self, patch: TourPatch, now: OffsetDateTime) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(pick_up) = patch.pick_up {
            self.pick_up = pick_up;
        }
        if let Some(meeting_point) = patch.meeting_point {
            self.meeting_point = meeting_point;
        }
        if let Some(drop_off) = patch.drop_off {
            self.drop_off = drop_off;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(duration_unit) = patch.duration_unit {
            self.duration_unit = duration_unit;
        }
        self.updated_at = stored_precision(now);
    }

    /// Whether the last update happened within [`RECENT_UPDATE_WINDOW`] of `now`.
    ///
    /// Timestamps in the future count as recent.
    pub fn recently_updated(&self, now: OffsetDateTime) -> bool {
        now - self.updated_at <= RECENT_UPDATE_WINDOW
    }
}

/// Validated input for a new tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTour {
    pub tour_id: i64,
    pub title: String,
    pub description: String,
    pub pick_up: String,
    pub meeting_point: String,
    pub drop_off: String,
    pub duration: i64,
    pub duration_unit: DurationUnit,
}

/// Fields to overwrite on update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TourPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pick_up: Option<String>,
    pub meeting_point: Option<String>,
    pub drop_off: Option<String>,
    pub duration: Option<i64>,
    pub duration_unit: Option<DurationUnit>,
}

impl TourPatch {
    /// True when the patch would change nothing but `updated_at`.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
