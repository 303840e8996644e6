//! Activity data models for the Strava API
//!
//! [`Activity`] is the record stored in the local cache. Its serialized form is
//! the Strava summary activity document, so the cache file stays compatible
//! with what the API returns and with caches written by earlier versions.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Meters per statute mile
pub const METERS_PER_MILE: f64 = 1609.34;

/// Strava activity type
///
/// Known types are listed explicitly; anything else is carried verbatim in
/// [`ActivityKind::Other`] so it survives a cache round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Run,
    VirtualRun,
    Ride,
    VirtualRide,
    Swim,
    Walk,
    Hike,
    Yoga,
    WeightTraining,
    Workout,
    Other(String),
}

impl ActivityKind {
    /// The Strava type string
    pub fn as_str(&self) -> &str {
        match self {
            ActivityKind::Run => "Run",
            ActivityKind::VirtualRun => "VirtualRun",
            ActivityKind::Ride => "Ride",
            ActivityKind::VirtualRide => "VirtualRide",
            ActivityKind::Swim => "Swim",
            ActivityKind::Walk => "Walk",
            ActivityKind::Hike => "Hike",
            ActivityKind::Yoga => "Yoga",
            ActivityKind::WeightTraining => "WeightTraining",
            ActivityKind::Workout => "Workout",
            ActivityKind::Other(s) => s,
        }
    }

    pub fn is_run(&self) -> bool {
        matches!(self, ActivityKind::Run | ActivityKind::VirtualRun)
    }

    pub fn is_ride(&self) -> bool {
        matches!(self, ActivityKind::Ride | ActivityKind::VirtualRide)
    }

    /// Short label used in the activity table
    pub fn short_label(&self) -> String {
        match self {
            ActivityKind::Run | ActivityKind::VirtualRun => "Run".to_string(),
            ActivityKind::Ride | ActivityKind::VirtualRide => "Ride".to_string(),
            ActivityKind::Swim => "Swim".to_string(),
            ActivityKind::Walk => "Walk".to_string(),
            ActivityKind::Hike => "Hike".to_string(),
            ActivityKind::Yoga => "Yoga".to_string(),
            ActivityKind::WeightTraining => "Wts".to_string(),
            ActivityKind::Workout => "Wrkt".to_string(),
            ActivityKind::Other(s) => s.chars().take(4).collect(),
        }
    }
}

impl Default for ActivityKind {
    fn default() -> Self {
        ActivityKind::Other("Other".to_string())
    }
}

impl From<&str> for ActivityKind {
    fn from(s: &str) -> Self {
        match s {
            "Run" => ActivityKind::Run,
            "VirtualRun" => ActivityKind::VirtualRun,
            "Ride" => ActivityKind::Ride,
            "VirtualRide" => ActivityKind::VirtualRide,
            "Swim" => ActivityKind::Swim,
            "Walk" => ActivityKind::Walk,
            "Hike" => ActivityKind::Hike,
            "Yoga" => ActivityKind::Yoga,
            "WeightTraining" => ActivityKind::WeightTraining,
            "Workout" => ActivityKind::Workout,
            other => ActivityKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActivityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ActivityKind::from(s.as_str()))
    }
}

/// A cached Strava activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActivityDocument", into = "ActivityDocument")]
pub struct Activity {
    /// Unique activity identifier assigned by Strava
    pub id: u64,
    pub kind: ActivityKind,
    /// Local wall-clock start time
    pub start_date_local: DateTime<FixedOffset>,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Average heart rate in bpm, when the activity recorded one
    pub heart_rate: Option<f64>,
    pub name: String,
    /// Fields not modelled above, kept so the cache round-trips losslessly
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Activity {
    pub fn new(id: u64, kind: ActivityKind, start_date_local: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            kind,
            start_date_local,
            distance: 0.0,
            moving_time: 0,
            heart_rate: None,
            name: String::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance = meters;
        self
    }

    pub fn with_moving_time(mut self, seconds: u64) -> Self {
        self.moving_time = seconds;
        self
    }

    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    /// Cache key for this activity
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// Calendar date of the local start time
    pub fn local_date(&self) -> NaiveDate {
        self.start_date_local.date_naive()
    }

    /// Distance in miles
    pub fn distance_miles(&self) -> f64 {
        self.distance / METERS_PER_MILE
    }
}

/// Wire shape of a Strava summary activity
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActivityDocument {
    id: u64,
    #[serde(rename = "type", default)]
    kind: ActivityKind,
    #[serde(with = "rfc3339")]
    start_date_local: DateTime<FixedOffset>,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    moving_time: u64,
    #[serde(default)]
    has_heartrate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    average_heartrate: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    name: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Strava timestamps are RFC 3339 with a `Z` suffix; keep that form on write
mod rfc3339 {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<FixedOffset>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

const HAS_HEARTRATE: &str = "has_heartrate";
const AVERAGE_HEARTRATE: &str = "average_heartrate";

impl From<ActivityDocument> for Activity {
    fn from(doc: ActivityDocument) -> Self {
        let mut extra = doc.extra;
        let heart_rate = if doc.has_heartrate {
            doc.average_heartrate.filter(|hr| *hr > 0.0)
        } else {
            None
        };

        // Heart rate fields that do not make a usable reading stay verbatim
        if heart_rate.is_none() {
            if doc.has_heartrate {
                extra.insert(HAS_HEARTRATE.to_string(), serde_json::Value::Bool(true));
            }
            if let Some(avg) = doc.average_heartrate.and_then(serde_json::Number::from_f64) {
                extra.insert(AVERAGE_HEARTRATE.to_string(), serde_json::Value::Number(avg));
            }
        }

        Self {
            id: doc.id,
            kind: doc.kind,
            start_date_local: doc.start_date_local,
            distance: doc.distance.max(0.0),
            moving_time: doc.moving_time,
            heart_rate,
            name: doc.name,
            extra,
        }
    }
}

impl From<Activity> for ActivityDocument {
    fn from(activity: Activity) -> Self {
        let mut extra = activity.extra;
        let raw_flag = extra.remove(HAS_HEARTRATE).and_then(|v| v.as_bool());
        let raw_average = extra.remove(AVERAGE_HEARTRATE).and_then(|v| v.as_f64());

        let (has_heartrate, average_heartrate) = match activity.heart_rate {
            Some(hr) => (true, Some(hr)),
            None => (raw_flag.unwrap_or(false), raw_average),
        };

        Self {
            id: activity.id,
            kind: activity.kind,
            start_date_local: activity.start_date_local,
            distance: activity.distance,
            moving_time: activity.moving_time,
            has_heartrate,
            average_heartrate,
            name: activity.name,
            extra,
        }
    }
}
