mod compare;
mod device_measures;
mod devices;
mod export;
mod heatmap;
mod kpis;
mod production;
mod status;
mod summary;
mod watch;
mod weekly;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use reqwest::Url;

pub use self::{
    compare::{CompareArgs, compare},
    device_measures::{DeviceMeasuresArgs, device_measures},
    devices::{DevicesArgs, devices},
    export::{ExportArgs, export},
    heatmap::{HeatmapArgs, heatmap},
    kpis::{KpisArgs, kpis},
    production::{ProductionArgs, production},
    status::{StatusArgs, status},
    summary::summary,
    watch::{WatchArgs, watch},
    weekly::{WeeklyArgs, weekly},
};
use crate::{
    api::Plants,
    core::{
        comparison::ZeroBaseline,
        plant::{Plant, PlantSet},
        window::DateWindow,
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub api: ApiArgs,

    /// Known plants, readings of any other plant are skipped.
    #[clap(
        long = "plants",
        env = "PLANTS",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "gsbp,reina-sofia,mmvi",
        global = true,
    )]
    pub plants: Vec<Plant>,

    /// Percentage change reported when the previous total is zero.
    #[clap(long, env = "ZERO_BASELINE", value_enum, default_value_t, global = true)]
    pub zero_baseline: ZeroBaseline,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    #[must_use]
    pub fn plants(&self) -> PlantSet {
        self.plants.iter().copied().collect()
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Daily production per plant over the window.
    #[clap(name = "production")]
    Production(ProductionArgs),

    /// Compare the window totals against the previous window.
    #[clap(name = "compare")]
    Compare(CompareArgs),

    /// Compare the last days against the same number of days before them.
    #[clap(name = "weekly")]
    Weekly(WeeklyArgs),

    /// Power heatmap of a single plant by weekday and hour.
    #[clap(name = "heatmap")]
    Heatmap(HeatmapArgs),

    /// Weekly energy card of every plant.
    #[clap(name = "summary")]
    Summary,

    /// Periodically refetch and print the window comparison.
    #[clap(name = "watch")]
    Watch(WatchArgs),

    /// Export the window production report as TOML.
    #[clap(name = "export")]
    Export(ExportArgs),

    /// Inverter status records of a single plant over the last days.
    #[clap(name = "status")]
    Status(StatusArgs),

    /// Performance ratio and yield over the window.
    #[clap(name = "kpis")]
    Kpis(KpisArgs),

    /// Output devices of a single plant.
    #[clap(name = "devices")]
    Devices(DevicesArgs),

    /// Phase voltage or current of a single device over the window.
    #[clap(name = "device-measures")]
    DeviceMeasures(DeviceMeasuresArgs),
}

#[derive(Parser)]
pub struct ApiArgs {
    /// Plant monitoring API base URL.
    #[clap(
        long = "api-base-url",
        env = "PLANTS_API_BASE_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    pub base_url: Url,

    /// Bearer token of the plant monitoring API.
    #[clap(long = "api-token", env = "PLANTS_API_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,
}

impl ApiArgs {
    pub fn new_client(&self) -> Result<Plants> {
        Plants::try_new(self.base_url.clone(), self.access_token.as_deref())
    }
}

#[derive(Copy, Clone, Parser)]
pub struct WindowArgs {
    /// First day of the window, inclusive.
    #[clap(long = "start")]
    pub start: NaiveDate,

    /// Last day of the window, inclusive.
    #[clap(long = "end")]
    pub end: NaiveDate,
}

impl WindowArgs {
    pub fn window(self) -> Result<DateWindow> {
        DateWindow::try_new(self.start, self.end)
    }
}

#[derive(Copy, Clone, Parser)]
pub struct UnitArgs {
    /// Readings are divided by this constant for display, `1000` turns Wh into kWh.
    #[clap(long = "divisor", default_value = "1000")]
    pub divisor: f64,
}
