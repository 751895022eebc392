//! Plant monitoring API client.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::{
    api::client,
    core::{
        comparison::{PlantComparison, ZeroBaseline},
        energy::WattHours,
        device::{Device, Devices},
        kpi::{Kpi, Kpis},
        measure::{Measure, MeasuresPage, Variable},
        plant::Plant,
        reading::{RawReading, Readings},
        status::{StatusPage, StatusRecord},
        window::DateWindow,
    },
    prelude::*,
};

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn try_new(base_url: Url, access_token: Option<&str>) -> Result<Self> {
        Ok(Self { client: client::try_new(access_token)?, base_url })
    }

    /// Fetch all the raw plant readings.
    #[instrument(skip_all, fields(base_url = %self.base_url))]
    pub async fn get_readings(&self) -> Result<Vec<RawReading>> {
        let url = self.endpoint(&["api", "plants"])?;
        info!("fetching the readings…");
        let readings = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to request the plant readings")?
            .error_for_status()
            .context("the plant readings request failed")?
            .json::<Readings>()
            .await
            .context("failed to deserialize the plant readings")?
            .0;
        info!(n_readings = readings.len(), "fetched");
        Ok(readings)
    }

    /// Fetch the power measures of the plant over the window.
    #[instrument(skip_all, fields(plant = %plant, window = %window))]
    pub async fn get_power_measures(
        &self,
        plant: Plant,
        window: DateWindow,
    ) -> Result<Vec<Measure>> {
        self.get_measures(&MeasuresQuery::power(plant, window)).await
    }

    /// Fetch the phase measures of the plant devices over the window.
    #[instrument(skip_all, fields(plant = %plant, variable = variable.name(), window = %window))]
    pub async fn get_device_measures(
        &self,
        plant: Plant,
        variable: Variable,
        window: DateWindow,
    ) -> Result<Vec<Measure>> {
        self.get_measures(&MeasuresQuery::device(plant, variable, window)).await
    }

    async fn get_measures(&self, query: &MeasuresQuery) -> Result<Vec<Measure>> {
        let mut url = self.endpoint(&["api", "measures", "paginated"])?;
        url.set_query(Some(&query.to_query_string()?));
        info!("fetching the measures…");
        let measures = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to request the measures")?
            .error_for_status()
            .context("the measures request failed")?
            .json::<MeasuresPage>()
            .await
            .context("failed to deserialize the measures")?
            .measures;
        info!(n_measures = measures.len(), "fetched");
        Ok(measures)
    }

    /// Fetch the inverter status records of the plant over the window.
    #[instrument(skip_all, fields(plant = %plant, window = %window))]
    pub async fn get_device_statuses(
        &self,
        plant: Plant,
        window: DateWindow,
    ) -> Result<Vec<StatusRecord>> {
        let mut url = self.endpoint(&["api", "measures", "status"])?;
        url.set_query(Some(&MeasuresQuery::status(plant, window).to_query_string()?));
        info!("fetching the statuses…");
        let records = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to request the device statuses")?
            .error_for_status()
            .context("the device status request failed")?
            .json::<StatusPage>()
            .await
            .context("failed to deserialize the device statuses")?
            .records;
        info!(n_records = records.len(), "fetched");
        Ok(records)
    }

    /// Fetch the KPI samples of all the plants.
    #[instrument(skip_all)]
    pub async fn get_kpis(&self) -> Result<Vec<Kpi>> {
        let url = self.endpoint(&["api", "kpis"])?;
        let kpis = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to request the KPIs")?
            .error_for_status()
            .context("the KPI request failed")?
            .json::<Kpis>()
            .await
            .context("failed to deserialize the KPIs")?
            .0;
        info!(n_kpis = kpis.len(), "fetched");
        Ok(kpis)
    }

    /// Fetch the devices of all the plants.
    #[instrument(skip_all)]
    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        let url = self.endpoint(&["api", "devices"])?;
        let devices = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to request the devices")?
            .error_for_status()
            .context("the device request failed")?
            .json::<Devices>()
            .await
            .context("failed to deserialize the devices")?
            .0;
        debug!(n_devices = devices.len(), "fetched");
        Ok(devices)
    }

    /// Fetch the weekly energy summary of the plant.
    #[instrument(skip_all, fields(plant = %plant))]
    pub async fn get_energy_summary(&self, plant: Plant) -> Result<EnergySummary> {
        let station_id = plant.station_id().to_string();
        let url = self.endpoint(&["api", "plants", "energyData", &station_id])?;
        let summary = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to request the energy summary of {plant}"))?
            .error_for_status()
            .with_context(|| format!("the energy summary request for {plant} failed"))?
            .json::<EnergySummary>()
            .await
            .with_context(|| format!("failed to deserialize the energy summary of {plant}"))?;
        debug!(
            current_week = ?summary.current_week_energy,
            previous_week = ?summary.previous_week_energy,
            "fetched",
        );
        Ok(summary)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("`{}` cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MeasuresQuery {
    plant_id: u64,
    page: u32,
    size: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    variable_type: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    variable: Option<&'static str>,

    start_date: String,
    end_date: String,
}

impl MeasuresQuery {
    /// Single page of the power measures covering whole days of the window.
    fn power(plant: Plant, window: DateWindow) -> Self {
        Self {
            variable_type: Some("Power"),
            ..Self::whole_days(plant, 10_000, window)
        }
    }

    fn device(plant: Plant, variable: Variable, window: DateWindow) -> Self {
        Self {
            variable_type: Some(variable.variable_type()),
            variable: Some(variable.name()),
            ..Self::whole_days(plant, 1000, window)
        }
    }

    fn status(plant: Plant, window: DateWindow) -> Self {
        Self::whole_days(plant, 1000, window)
    }

    fn whole_days(plant: Plant, size: u32, window: DateWindow) -> Self {
        Self {
            plant_id: plant.station_id(),
            page: 1,
            size,
            variable_type: None,
            variable: None,
            start_date: format!("{}T00:00:00Z", window.start()),
            end_date: format!("{}T23:59:59Z", window.end()),
        }
    }

    fn to_query_string(&self) -> Result<String> {
        serde_qs::to_string(self).context("failed to encode the measures query")
    }
}

/// Weekly energy summary of a single plant.
#[must_use]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySummary {
    #[serde(default)]
    pub current_week_energy: WattHours,

    #[serde(default)]
    pub previous_week_energy: WattHours,

    #[serde(default)]
    pub current_week_daily_data: BTreeMap<NaiveDate, WattHours>,
}

impl EnergySummary {
    pub fn comparison(&self, policy: ZeroBaseline) -> PlantComparison {
        PlantComparison::new(self.current_week_energy, self.previous_week_energy, policy)
    }

    /// Daily values of the current week in chronological order.
    #[must_use]
    pub fn sparkline(&self) -> Vec<WattHours> {
        self.current_week_daily_data.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_endpoint_ok() -> Result {
        let api = Api::try_new(Url::parse("http://localhost:8080/")?, None)?;
        assert_eq!(
            api.endpoint(&["api", "plants", "energyData", "49951765"])?.as_str(),
            "http://localhost:8080/api/plants/energyData/49951765"
        );

        let api = Api::try_new(Url::parse("https://example.com/proxy")?, None)?;
        assert_eq!(api.endpoint(&["api", "plants"])?.as_str(), "https://example.com/proxy/api/plants");
        Ok(())
    }

    #[test]
    fn test_measures_query_ok() -> Result {
        let day = NaiveDate::from_ymd_opt(2024, 5, 13).context("invalid date")?;
        let window = DateWindow::try_new(day, day.succ_opt().context("invalid date")?)?;
        let query = MeasuresQuery::power(Plant::Gsbp, window).to_query_string()?;
        assert!(
            query.starts_with("plantId=49951765&page=1&size=10000&variableType=Power&startDate=2024-05-13T00"),
            "{query}"
        );
        assert!(query.contains("&endDate=2024-05-14T23"), "{query}");
        Ok(())
    }

    #[test]
    fn test_device_measures_query_ok() -> Result {
        let day = NaiveDate::from_ymd_opt(2024, 5, 13).context("invalid date")?;
        let window = DateWindow::try_new(day, day)?;
        let query = MeasuresQuery::device(Plant::Mmvi, Variable::ACurrent, window).to_query_string()?;
        assert!(
            query.starts_with(
                "plantId=33783322&page=1&size=1000&variableType=Electricity&variable=AoutputElectricity&startDate="
            ),
            "{query}"
        );
        Ok(())
    }

    #[test]
    fn test_status_query_ok() -> Result {
        let day = NaiveDate::from_ymd_opt(2024, 5, 13).context("invalid date")?;
        let window = DateWindow::try_new(day, day)?;
        let query = MeasuresQuery::status(Plant::ReinaSofia, window).to_query_string()?;
        assert!(query.starts_with("plantId=36076361&page=1&size=1000&startDate=2024-05-13T00"), "{query}");
        assert!(!query.contains("variable"), "{query}");
        Ok(())
    }

    #[test]
    fn test_deserialize_energy_summary_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "currentWeekEnergy": 3000.0,
                "previousWeekEnergy": 1500.0,
                "currentWeekDailyData": {
                    "2024-05-14": 2000.0,
                    "2024-05-13": 1000.0
                }
            }
        "#;
        let summary = serde_json::from_str::<EnergySummary>(RESPONSE)?;
        assert_eq!(summary.sparkline(), [WattHours(1000.0), WattHours(2000.0)]);
        assert_abs_diff_eq!(summary.comparison(ZeroBaseline::Zero).percent_change.unwrap(), 100.0);
        Ok(())
    }

    #[test]
    fn test_energy_summary_without_previous_week() -> Result {
        // language=JSON
        let summary = serde_json::from_str::<EnergySummary>(r#"{ "currentWeekEnergy": 10.0 }"#)?;
        assert_eq!(summary.comparison(ZeroBaseline::Zero).percent_change, Some(0.0));
        assert_eq!(summary.comparison(ZeroBaseline::Undefined).percent_change, None);
        assert!(summary.sparkline().is_empty());
        Ok(())
    }
}
