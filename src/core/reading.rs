use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::serde_as;

use crate::core::{
    energy::WattHours,
    plant::{Plant, PlantSet},
};

/// Plant API response: a flat list of readings.
///
/// Elements which are not even objects are skipped.
#[must_use]
#[serde_as]
#[derive(Deserialize, derive_more::IntoIterator)]
pub struct Readings(#[serde_as(as = "serde_with::VecSkipError<_>")] pub Vec<RawReading>);

/// Single energy reading as returned by the plant API.
///
/// Deserialization is lenient: every field may be missing or malformed,
/// aggregation decides what to do with such a reading.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct RawReading {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub key: ReadingKey,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "plantName", default)]
    pub plant_name: Option<String>,

    #[serde(rename = "dayEnergy", default, deserialize_with = "deserialize_lenient_energy")]
    pub day_energy: WattHours,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReadingKey {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub datetime: Option<String>,

    /// Only set on the per-device measures.
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "deviceId", default)]
    pub device_id: Option<u64>,
}

impl ReadingKey {
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.datetime.as_deref().and_then(parse_timestamp)
    }
}

impl RawReading {
    /// Calendar date of the reading as recorded, without any timezone conversion.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.key.datetime.as_deref().and_then(truncate_to_date)
    }

    /// Resolve the plant within the known set.
    #[must_use]
    pub fn plant(&self, plants: PlantSet) -> Option<Plant> {
        self.plant_name
            .as_deref()
            .and_then(Plant::from_name)
            .filter(|plant| plants.contains(*plant))
    }
}

/// Parse an ISO-8601 timestamp as the wall-clock time it was recorded in.
///
/// The UTC offset, if any, is dropped without converting. Seconds are optional.
pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    let (date, time) = timestamp.trim().split_once(['T', ' '])?;
    let time = time.find(['Z', 'z', '+', '-']).map_or(time, |offset| &time[..offset]);
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    Some(parse_date(date)?.and_time(time))
}

/// Calendar date of an ISO-8601 timestamp or a bare date: its `YYYY-MM-DD` prefix.
pub fn truncate_to_date(timestamp: &str) -> Option<NaiveDate> {
    let timestamp = timestamp.trim();
    parse_date(timestamp.split_once(['T', ' ']).map_or(timestamp, |(date, _)| date))
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Coerce a JSON value into a finite number, falling back to zero.
pub fn coerce_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => string.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite()).unwrap_or_default()
}

pub fn deserialize_lenient_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<f64, D::Error> {
    Ok(coerce_number(&Value::deserialize(deserializer)?))
}

fn deserialize_lenient_energy<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<WattHours, D::Error> {
    deserialize_lenient_number(deserializer).map(WattHours)
}
