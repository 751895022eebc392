use std::{collections::BTreeMap, ops::Index};

use serde::Serialize;

use crate::core::{
    daily::DailyPlantEnergy,
    energy::WattHours,
    plant::Plant,
    window::DateWindow,
};

/// What the percentage change is when the previous total is zero.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum ZeroBaseline {
    /// Report no change.
    #[default]
    Zero,

    /// Leave the change undefined.
    Undefined,
}

impl ZeroBaseline {
    /// Percentage change of `current` against `previous`.
    #[must_use]
    pub fn percent_change(self, current: WattHours, previous: WattHours) -> Option<f64> {
        if previous == WattHours::ZERO {
            match self {
                Self::Zero => Some(0.0),
                Self::Undefined => None,
            }
        } else {
            Some((current - previous) / previous * 100.0)
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PlantComparison {
    pub current_total: WattHours,
    pub previous_total: WattHours,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}

impl PlantComparison {
    pub fn new(current_total: WattHours, previous_total: WattHours, policy: ZeroBaseline) -> Self {
        Self {
            current_total,
            previous_total,
            percent_change: policy.percent_change(current_total, previous_total),
        }
    }
}

/// Per-plant totals of two windows and the change between them.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::IntoIterator)]
pub struct Comparison(BTreeMap<Plant, PlantComparison>);

impl Comparison {
    /// Compare the totals of every known plant over the two windows.
    ///
    /// Windows are conventionally adjacent, but overlap is not checked:
    /// each side simply sums whatever its window selects.
    pub fn derive(
        daily: &DailyPlantEnergy,
        current: DateWindow,
        previous: DateWindow,
        policy: ZeroBaseline,
    ) -> Self {
        let current = daily.filter(current);
        let previous = daily.filter(previous);
        Self(
            daily
                .plants()
                .iter()
                .map(|plant| {
                    (plant, PlantComparison::new(current.total(plant), previous.total(plant), policy))
                })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (Plant, &PlantComparison)> {
        self.0.iter().map(|(plant, comparison)| (*plant, comparison))
    }
}

impl Index<Plant> for Comparison {
    type Output = PlantComparison;

    fn index(&self, plant: Plant) -> &Self::Output {
        &self.0[&plant]
    }
}
