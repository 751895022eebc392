use std::collections::BTreeMap;

use bon::Builder;
use serde::Serialize;

use crate::core::{
    comparison::Comparison,
    plant::Plant,
    window::DateWindow,
};

/// Production summary of a window against the previous one, for export.
#[must_use]
#[derive(Builder, Serialize)]
pub struct ProductionReport {
    /// Unit constant the totals are divided by.
    pub divisor: f64,

    pub current_window: DateWindow,

    pub previous_window: DateWindow,

    /// Scaled totals over the current window.
    pub totals: BTreeMap<Plant, f64>,

    pub comparison: Comparison,
}

impl ProductionReport {
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        core::{
            comparison::ZeroBaseline,
            daily::DailyPlantEnergy,
            plant::PlantSet,
            reading::Readings,
            series::ChartSeries,
        },
        prelude::*,
    };

    #[test]
    fn test_to_toml_ok() -> Result {
        // language=JSON
        const READINGS: &str = r#"
            [
                { "key": { "datetime": "2024-05-09T09:00:00Z" }, "plantName": "GSBP", "dayEnergy": 1500 },
                { "key": { "datetime": "2024-05-10T09:00:00Z" }, "plantName": "GSBP", "dayEnergy": 3000 }
            ]
        "#;
        let readings = serde_json::from_str::<Readings>(READINGS)?.0;
        let daily = DailyPlantEnergy::normalize(&readings, PlantSet::only(Plant::Gsbp));
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).context("invalid date")?;
        let current_window = DateWindow::try_new(day, day)?;
        let previous_window = current_window.previous()?;

        let report = ProductionReport::builder()
            .divisor(1000.0)
            .current_window(current_window)
            .previous_window(previous_window)
            .totals(ChartSeries::from(&daily.filter(current_window)).totals(1000.0)?)
            .comparison(Comparison::derive(
                &daily,
                current_window,
                previous_window,
                ZeroBaseline::Zero,
            ))
            .build();

        let toml = report.to_toml()?;
        assert!(toml.contains("start = \"2024-05-10\""), "{toml}");
        assert!(toml.contains("start = \"2024-05-09\""), "{toml}");
        assert!(toml.contains("GSBP = 3.0"), "{toml}");
        assert!(toml.contains("percent_change = 100.0"), "{toml}");
        Ok(())
    }
}
