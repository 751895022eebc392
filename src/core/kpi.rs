use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_with::serde_as;

use crate::core::{
    reading::{deserialize_lenient_number, parse_timestamp},
    window::DateWindow,
};

#[must_use]
#[serde_as]
#[derive(Deserialize, derive_more::IntoIterator)]
pub struct Kpis(#[serde_as(as = "serde_with::VecSkipError<_>")] pub Vec<Kpi>);

/// Single plant KPI sample.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Kpi {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub datetime: Option<String>,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub key: KpiKey,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct KpiKey {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "kpiName", default)]
    pub kpi_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub value: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum KpiKind {
    PerformanceRatio,
    Yield,
}

impl KpiKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PerformanceRatio => "Performance Ratio",
            Self::Yield => "Yield",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::PerformanceRatio, Self::Yield].into_iter().find(|kind| kind.name() == name)
    }
}

/// KPI values within a window, keyed by their timestamp in chronological order.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KpiSeries(BTreeMap<NaiveDateTime, BTreeMap<KpiKind, f64>>);

impl KpiSeries {
    /// Keep the known KPIs recorded within the window.
    ///
    /// Samples of the same kind at the same timestamp are summed up.
    pub fn within<'a>(kpis: impl IntoIterator<Item = &'a Kpi>, window: DateWindow) -> Self {
        let mut series = BTreeMap::<NaiveDateTime, BTreeMap<KpiKind, f64>>::new();
        for kpi in kpis {
            let Some(timestamp) = kpi.datetime.as_deref().and_then(parse_timestamp) else {
                continue;
            };
            let Some(kind) = kpi.key.kpi_name.as_deref().and_then(KpiKind::from_name) else {
                continue;
            };
            if window.contains(timestamp.date()) {
                *series.entry(timestamp).or_default().entry(kind).or_default() += kpi.key.value;
            }
        }
        Self(series)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, Option<f64>, Option<f64>)> + '_ {
        self.0.iter().map(|(timestamp, values)| {
            (
                *timestamp,
                values.get(&KpiKind::PerformanceRatio).copied(),
                values.get(&KpiKind::Yield).copied(),
            )
        })
    }

    /// Chronological values of a single KPI.
    #[must_use]
    pub fn values(&self, kind: KpiKind) -> Vec<f64> {
        self.0.values().filter_map(|values| values.get(&kind).copied()).collect()
    }
}
