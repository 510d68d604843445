use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for calendar days (`YYYY-MM-DD`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// One habit's logged value for exactly one day.
///
/// Value object: edits produce a new entry via [`HabitEntry::with_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` means nothing has been logged for this day yet.
    #[serde(rename = "log_value", default)]
    pub logged_value: Option<f64>,
}

impl HabitEntry {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            logged_value: None,
        }
    }

    /// Copy of this entry with `logged_value` replaced.
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            logged_value: Some(value),
            ..self.clone()
        }
    }

    /// Logged value with "not logged" read as zero.
    pub fn value_or_zero(&self) -> f64 {
        self.logged_value.unwrap_or(0.0)
    }
}

/// Body of a remote write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRequest {
    pub habit_id: i64,
    #[serde(with = "day_format")]
    pub date: NaiveDate,
    pub value: f64,
}

/// Format a day the way the remote API expects it.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DAY_FORMAT)
}

mod day_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_day(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_day(&raw).map_err(serde::de::Error::custom)
    }
}
