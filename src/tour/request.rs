//! Request payloads and their validation.
//!
//! Fields follow truthiness rules: an empty string or a zero number counts as
//! absent. Numbers may arrive as JSON numbers or as numeric strings, since
//! HTML form values are strings.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::error::TourError;

use super::types::{DurationUnit, NewTour, TourPatch};

/// Body of `POST /tour`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateTourRequest {
    #[serde(default, deserialize_with = "lenient_int")]
    #[schema(value_type = i64, example = 7)]
    pub tour_id: Option<i64>,
    #[serde(default)]
    #[schema(value_type = String, example = "Old Town Walk")]
    pub title: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub pick_up: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub meeting_point: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub drop_off: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    #[schema(value_type = i64, example = 3)]
    pub duration: Option<i64>,
    #[serde(default)]
    #[schema(value_type = DurationUnit)]
    pub duration_unit: Option<String>,
}

impl CreateTourRequest {
    /// Check every required field and produce a [`NewTour`].
    pub fn validate(self) -> Result<NewTour, TourError> {
        let tour_id = truthy_int(self.tour_id);
        let title = truthy_str(self.title);
        let description = truthy_str(self.description);
        let pick_up = truthy_str(self.pick_up);
        let meeting_point = truthy_str(self.meeting_point);
        let drop_off = truthy_str(self.drop_off);
        let duration = truthy_int(self.duration);
        let duration_unit = truthy_str(self.duration_unit);

        let mut missing = Vec::new();
        if tour_id.is_none() {
            missing.push("tour_id");
        }
        if title.is_none() {
            missing.push("title");
        }
        if description.is_none() {
            missing.push("description");
        }
        if pick_up.is_none() {
            missing.push("pick_up");
        }
        if meeting_point.is_none() {
            missing.push("meeting_point");
        }
        if drop_off.is_none() {
            missing.push("drop_off");
        }
        if duration.is_none() {
            missing.push("duration");
        }
        if duration_unit.is_none() {
            missing.push("duration_unit");
        }

        match (
            tour_id,
            title,
            description,
            pick_up,
            meeting_point,
            drop_off,
            duration,
            duration_unit,
        ) {
            (
                Some(tour_id),
                Some(title),
                Some(description),
                Some(pick_up),
                Some(meeting_point),
                Some(drop_off),
                Some(duration),
                Some(duration_unit),
            ) => Ok(NewTour {
                tour_id,
                title,
                description,
                pick_up,
                meeting_point,
                drop_off,
                duration,
                duration_unit: parse_unit(&duration_unit)?,
            }),
            _ => Err(TourError::MissingFields(missing)),
        }
    }
}

/// Body of `PUT /tour/:id`. Every field is optional; `tour_id` is not updatable.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTourRequest {
    #[serde(default)]
    #[schema(value_type = String, example = "Night Walk")]
    pub title: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub pick_up: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub meeting_point: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub drop_off: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    #[schema(value_type = i64)]
    pub duration: Option<i64>,
    #[serde(default)]
    #[schema(value_type = DurationUnit)]
    pub duration_unit: Option<String>,
}

impl UpdateTourRequest {
    /// Keep only truthy fields. A non-empty but unknown `duration_unit` is rejected.
    pub fn into_patch(self) -> Result<TourPatch, TourError> {
        let duration_unit = match truthy_str(self.duration_unit) {
            Some(raw) => Some(parse_unit(&raw)?),
            None => None,
        };

        Ok(TourPatch {
            title: truthy_str(self.title),
            description: truthy_str(self.description),
            pick_up: truthy_str(self.pick_up),
            meeting_point: truthy_str(self.meeting_point),
            drop_off: truthy_str(self.drop_off),
            duration: truthy_int(self.duration),
            duration_unit,
        })
    }
}

fn truthy_str(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn truthy_int(value: Option<i64>) -> Option<i64> {
    value.filter(|n| *n != 0)
}

fn parse_unit(raw: &str) -> Result<DurationUnit, TourError> {
    DurationUnit::from_str(raw).map_err(|_| TourError::InvalidField {
        field: "duration_unit",
        reason: format!("`{}` is not one of {}", raw, DurationUnit::allowed()),
    })
}

/// Accepts an integer, a whole float, a numeric string, an empty string, or null.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Float(f))
            if f.fract() == 0.0
                && f.is_finite()
                && f >= i64::MIN as f64
                && f < i64::MAX as f64 =>
        {
            Ok(Some(f as i64))
        }
        Some(Raw::Float(f)) => Err(serde::de::Error::custom(format!(
            "expected an integer, got {}",
            f
        ))),
        Some(Raw::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, got `{}`", s)))
        }
    }
}
