use std::{
    collections::{BTreeMap, HashMap},
    ops::Index,
};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    core::{
        energy::WattHours,
        plant::{Plant, PlantSet},
        reading::RawReading,
        window::DateWindow,
    },
    prelude::*,
};

/// Energy per plant on a single day.
///
/// Dense over the known plant set: every known plant has an entry.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlantEnergy(BTreeMap<Plant, WattHours>);

impl PlantEnergy {
    pub fn zeroed(plants: PlantSet) -> Self {
        Self(plants.iter().map(|plant| (plant, WattHours::ZERO)).collect())
    }

    /// Energy of the plant, or zero if the plant is not tracked.
    pub fn get(&self, plant: Plant) -> WattHours {
        self.0.get(&plant).copied().unwrap_or_default()
    }

    fn add(&mut self, plant: Plant, energy: WattHours) {
        *self.0.entry(plant).or_default() += energy;
    }
}

impl Index<Plant> for PlantEnergy {
    type Output = WattHours;

    fn index(&self, plant: Plant) -> &Self::Output {
        self.0.get(&plant).unwrap_or(&WattHours::ZERO)
    }
}

/// Date-keyed per-plant energy.
///
/// Dates keep the order in which they were first encountered, which is not necessarily
/// chronological. Use [`crate::core::series::ChartSeries`] for a sorted time axis.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyPlantEnergy {
    plants: PlantSet,
    days: Vec<(NaiveDate, PlantEnergy)>,
    index: HashMap<NaiveDate, usize>,
}

impl DailyPlantEnergy {
    pub fn empty(plants: PlantSet) -> Self {
        Self { plants, days: Vec::new(), index: HashMap::new() }
    }

    /// Group the raw readings by calendar date and plant, summing up the day energy.
    ///
    /// Readings without a parsable date or of a plant outside `plants` are skipped.
    /// The readings themselves are left untouched.
    pub fn normalize<'a>(
        readings: impl IntoIterator<Item = &'a RawReading>,
        plants: PlantSet,
    ) -> Self {
        let mut n_skipped = 0_usize;
        let this = readings.into_iter().fold(Self::empty(plants), |mut this, reading| {
            if let (Some(date), Some(plant)) = (reading.date(), reading.plant(plants)) {
                this.accumulate(date, plant, reading.day_energy);
            } else {
                trace!(?reading, "skipped a malformed reading");
                n_skipped += 1;
            }
            this
        });
        debug!(n_dates = this.len(), n_skipped, "normalized the readings");
        this
    }

    /// Select the days within the window, preserving their order.
    pub fn filter(&self, window: DateWindow) -> Self {
        self.iter().filter(|(date, _)| window.contains(*date)).fold(
            Self::empty(self.plants),
            |mut this, (date, energy)| {
                this.push(date, energy.clone());
                this
            },
        )
    }

    #[must_use]
    pub const fn plants(&self) -> PlantSet {
        self.plants
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&PlantEnergy> {
        self.index.get(&date).map(|index| &self.days[*index].1)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().map(|(date, _)| *date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &PlantEnergy)> {
        self.days.iter().map(|(date, energy)| (*date, energy))
    }

    /// Total energy of the plant over all the days.
    pub fn total(&self, plant: Plant) -> WattHours {
        self.days.iter().map(|(_, energy)| energy.get(plant)).sum()
    }

    fn accumulate(&mut self, date: NaiveDate, plant: Plant, energy: WattHours) {
        let index = match self.index.get(&date).copied() {
            Some(index) => index,
            None => self.push(date, PlantEnergy::zeroed(self.plants)),
        };
        self.days[index].1.add(plant, energy);
    }

    fn push(&mut self, date: NaiveDate, energy: PlantEnergy) -> usize {
        let index = self.days.len();
        self.days.push((date, energy));
        self.index.insert(date, index);
        index
    }
}

impl Index<NaiveDate> for DailyPlantEnergy {
    type Output = PlantEnergy;

    fn index(&self, date: NaiveDate) -> &Self::Output {
        &self.days[self.index[&date]].1
    }
}
