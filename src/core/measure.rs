use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Deserialize;
use serde_with::serde_as;

use crate::core::reading::{ReadingKey, deserialize_lenient_number};

/// A page of the paginated measures endpoint.
#[must_use]
#[serde_as]
#[derive(Deserialize)]
pub struct MeasuresPage {
    #[serde_as(as = "serde_with::VecSkipError<_>")]
    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// Single sample of a measured variable.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Measure {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub key: ReadingKey,

    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub measure: f64,
}

/// Measured variables of the inverters, one per output phase.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Variable {
    AVoltage,
    BVoltage,
    CVoltage,
    ACurrent,
    BCurrent,
    CCurrent,
}

impl Variable {
    /// Value of the `variableType` query parameter.
    #[must_use]
    pub const fn variable_type(self) -> &'static str {
        match self {
            Self::AVoltage | Self::BVoltage | Self::CVoltage => "Voltage",
            Self::ACurrent | Self::BCurrent | Self::CCurrent => "Electricity",
        }
    }

    /// Value of the `variable` query parameter.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AVoltage => "AoutputVoltage",
            Self::BVoltage => "BoutputVoltage",
            Self::CVoltage => "CoutputVoltage",
            Self::ACurrent => "AoutputElectricity",
            Self::BCurrent => "BoutputElectricity",
            Self::CCurrent => "CoutputElectricity",
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::AVoltage | Self::BVoltage | Self::CVoltage => "V",
            Self::ACurrent | Self::BCurrent | Self::CCurrent => "A",
        }
    }
}

/// Chronological samples of a single device.
///
/// Samples of other devices and samples without a parsable timestamp are dropped.
#[must_use]
pub fn device_series<'a>(
    measures: impl IntoIterator<Item = &'a Measure>,
    device_id: u64,
) -> Vec<(NaiveDateTime, f64)> {
    measures
        .into_iter()
        .filter(|measure| measure.key.device_id == Some(device_id))
        .filter_map(|measure| Some((measure.key.timestamp()?, measure.measure)))
        .sorted_by_key(|(timestamp, _)| *timestamp)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_device_series_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "measures": [
                    { "key": { "datetime": "2024-05-14T10:00:00Z", "deviceId": 7 }, "measure": 231.5 },
                    { "key": { "datetime": "2024-05-14T09:00:00Z", "deviceId": 7 }, "measure": "229" },
                    { "key": { "datetime": "2024-05-14T09:30:00Z", "deviceId": 8 }, "measure": 1.0 },
                    { "key": { "deviceId": 7 }, "measure": 1.0 }
                ]
            }
        "#;
        let page = serde_json::from_str::<MeasuresPage>(RESPONSE)?;
        let series = device_series(&page.measures, 7);
        assert_eq!(
            series.iter().map(|(timestamp, value)| (timestamp.to_string(), *value)).collect_vec(),
            [("2024-05-14 09:00:00".to_string(), 229.0), ("2024-05-14 10:00:00".to_string(), 231.5)]
        );
        Ok(())
    }

    #[test]
    fn test_variable_query_names() {
        assert_eq!(Variable::BVoltage.variable_type(), "Voltage");
        assert_eq!(Variable::BVoltage.name(), "BoutputVoltage");
        assert_eq!(Variable::CCurrent.variable_type(), "Electricity");
        assert_eq!(Variable::CCurrent.name(), "CoutputElectricity");
        assert_eq!(Variable::CCurrent.unit(), "A");
    }
}
