use std::collections::HashMap;

use chrono::{Datelike, Timelike, Weekday};
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::core::measure::Measure;

/// Power summed up by weekday and hour of the day.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Heatmap {
    weekdays: Vec<Weekday>,
    hours: Vec<u32>,
    cells: HashMap<(Weekday, u32), f64>,
}

impl Heatmap {
    /// Aggregate the measures by the weekday and hour of their timestamps as recorded.
    ///
    /// Measures without a parsable timestamp are skipped.
    pub fn from_measures<'a>(measures: impl IntoIterator<Item = &'a Measure>) -> Self {
        let mut cells = HashMap::<(Weekday, u32), f64>::new();
        for measure in measures {
            let Some(timestamp) = measure.key.timestamp() else {
                continue;
            };
            *cells.entry((timestamp.weekday(), timestamp.hour())).or_default() += measure.measure;
        }
        let weekdays = cells
            .keys()
            .map(|(weekday, _)| *weekday)
            .unique()
            .sorted_unstable_by_key(Weekday::num_days_from_monday)
            .collect();
        let hours = cells.keys().map(|(_, hour)| *hour).unique().sorted_unstable().collect();
        Self { weekdays, hours, cells }
    }

    /// Weekdays that have any measures, from Monday to Sunday.
    #[must_use]
    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    /// Hours that have any measures, ascending.
    #[must_use]
    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    #[must_use]
    pub fn get(&self, weekday: Weekday, hour: u32) -> f64 {
        self.cells.get(&(weekday, hour)).copied().unwrap_or_default()
    }

    /// The cell with the largest sum.
    #[must_use]
    pub fn peak(&self) -> Option<(Weekday, u32, f64)> {
        self.cells
            .iter()
            .max_by_key(|(_, value)| OrderedFloat(**value))
            .map(|((weekday, hour), value)| (*weekday, *hour, *value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Colour intensity bucket of a heatmap cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Shade(usize);

impl Shade {
    /// Upper bounds of all the buckets but the last one, inclusive.
    const THRESHOLDS: [f64; 9] = [
        0.0,
        50_000.0,
        100_000.0,
        200_000.0,
        500_000.0,
        800_000.0,
        2_000_000.0,
        5_000_000.0,
        10_000_000.0,
    ];

    const PALETTE: [(u8, u8, u8); 10] = [
        (0xE0, 0xF7, 0xFA),
        (0xB2, 0xEB, 0xF2),
        (0x80, 0xDE, 0xEA),
        (0x4D, 0xD0, 0xE1),
        (0x26, 0xC6, 0xDA),
        (0x00, 0xBC, 0xD4),
        (0x00, 0xAC, 0xC1),
        (0x00, 0x97, 0xA7),
        (0x00, 0x83, 0x8F),
        (0x00, 0x60, 0x64),
    ];

    #[must_use]
    pub fn of(value: f64) -> Self {
        Self(
            Self::THRESHOLDS
                .iter()
                .position(|threshold| value <= *threshold)
                .unwrap_or(Self::THRESHOLDS.len()),
        )
    }

    #[must_use]
    pub const fn level(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        Self::PALETTE[self.0]
    }
}
