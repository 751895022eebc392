use std::collections::BTreeMap;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::{
    core::{comparison::ZeroBaseline, daily::DailyPlantEnergy, energy::WattHours, plant::Plant},
    prelude::*,
};

/// Chart-ready view: a chronological time axis and one aligned series per plant.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartSeries {
    labels: Vec<NaiveDate>,
    series: BTreeMap<Plant, Vec<WattHours>>,
}

impl From<&DailyPlantEnergy> for ChartSeries {
    fn from(daily: &DailyPlantEnergy) -> Self {
        let labels = daily.dates().sorted_unstable().collect_vec();
        let series = daily
            .plants()
            .iter()
            .map(|plant| {
                let values = labels
                    .iter()
                    .map(|date| daily.get(*date).map_or(WattHours::ZERO, |energy| energy.get(plant)))
                    .collect();
                (plant, values)
            })
            .collect();
        Self { labels, series }
    }
}

impl ChartSeries {
    /// Dates in ascending order.
    #[must_use]
    pub fn labels(&self) -> &[NaiveDate] {
        &self.labels
    }

    /// Values of the plant aligned with [`ChartSeries::labels`].
    #[must_use]
    pub fn series(&self, plant: Plant) -> &[WattHours] {
        self.series.get(&plant).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Plant, &[WattHours])> {
        self.series.iter().map(|(plant, values)| (*plant, values.as_slice()))
    }

    /// Per-plant totals divided by the display unit constant.
    pub fn totals(&self, divisor: f64) -> Result<BTreeMap<Plant, f64>> {
        ensure_divisor(divisor)?;
        Ok(self
            .iter()
            .map(|(plant, values)| (plant, values.iter().copied().sum::<WattHours>().scaled(divisor)))
            .collect())
    }

    /// Every point divided by the display unit constant.
    pub fn scaled(&self, divisor: f64) -> Result<BTreeMap<Plant, Vec<f64>>> {
        ensure_divisor(divisor)?;
        Ok(self
            .iter()
            .map(|(plant, values)| {
                (plant, values.iter().map(|value| value.scaled(divisor)).collect())
            })
            .collect())
    }

    /// Point-wise percentage change against another series, matched by position.
    ///
    /// Points missing in `previous` count as zero.
    #[must_use]
    pub fn percent_changes(
        &self,
        previous: &Self,
        policy: ZeroBaseline,
    ) -> BTreeMap<Plant, Vec<Option<f64>>> {
        self.iter()
            .map(|(plant, values)| {
                let previous_values = previous.series(plant);
                let changes = values
                    .iter()
                    .enumerate()
                    .map(|(index, current)| {
                        let baseline = previous_values.get(index).copied().unwrap_or_default();
                        policy.percent_change(*current, baseline)
                    })
                    .collect();
                (plant, changes)
            })
            .collect()
    }
}

fn ensure_divisor(divisor: f64) -> Result {
    ensure!(
        divisor.is_finite() && divisor != 0.0,
        "the unit divisor must be a finite non-zero number, got {divisor}"
    );
    Ok(())
}
