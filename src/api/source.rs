use async_trait::async_trait;

use crate::{
    api::plants::Api,
    core::{daily::DailyPlantEnergy, plant::PlantSet, reading::RawReading},
    prelude::*,
};

/// Source of the raw plant readings.
#[async_trait]
pub trait PlantDataSource: Sync {
    async fn fetch_readings(&self) -> Result<Vec<RawReading>>;

    /// Fetch the readings and group them by date and plant.
    ///
    /// A failed fetch is propagated as is, nothing gets aggregated in that case.
    #[instrument(skip_all)]
    async fn fetch_daily(&self, plants: PlantSet) -> Result<DailyPlantEnergy> {
        let readings = self.fetch_readings().await?;
        Ok(DailyPlantEnergy::normalize(&readings, plants))
    }
}

#[async_trait]
impl PlantDataSource for Api {
    async fn fetch_readings(&self) -> Result<Vec<RawReading>> {
        self.get_readings().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::core::{energy::WattHours, plant::Plant, reading::Readings};

    struct InMemory(&'static str);

    #[async_trait]
    impl PlantDataSource for InMemory {
        async fn fetch_readings(&self) -> Result<Vec<RawReading>> {
            Ok(serde_json::from_str::<Readings>(self.0)?.0)
        }
    }

    struct Unavailable;

    #[async_trait]
    impl PlantDataSource for Unavailable {
        async fn fetch_readings(&self) -> Result<Vec<RawReading>> {
            bail!("503 Service Unavailable")
        }
    }

    #[tokio::test]
    async fn test_fetch_daily_ok() -> Result {
        // language=JSON
        let source = InMemory(
            r#"
                [
                    { "key": { "datetime": "2024-05-10T08:00:00Z" }, "plantName": "GSBP", "dayEnergy": 100 },
                    { "key": { "datetime": "2024-05-10T16:00:00Z" }, "plantName": "GSBP", "dayEnergy": 50 },
                    { "key": { "datetime": "2024-05-10T16:00:00Z" }, "plantName": "Unknown", "dayEnergy": 1 }
                ]
            "#,
        );
        let daily = source.fetch_daily(PlantSet::all()).await?;
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).context("invalid date")?;
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[date].get(Plant::Gsbp), WattHours(150.0));
        assert_eq!(daily[date].get(Plant::Mmvi), WattHours::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_daily_propagates_failure() {
        let error = Unavailable.fetch_daily(PlantSet::all()).await.unwrap_err();
        assert_eq!(error.to_string(), "503 Service Unavailable");
    }
}
