use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use itertools::Itertools;

use crate::{
    api::Plants,
    core::{plant::Plant, status::DeviceStatus, window::DateWindow},
    prelude::*,
    tables::build_status_table,
};

#[derive(Parser)]
pub struct StatusArgs {
    #[clap(long = "plant", value_enum)]
    pub plant: Plant,

    /// Last day of the period, defaults to the local today.
    #[clap(long = "today")]
    pub today: Option<NaiveDate>,

    /// Number of days to look back before the last day.
    #[clap(long = "days", default_value = "7")]
    pub n_days: u64,
}

impl StatusArgs {
    pub fn window(&self) -> Result<DateWindow> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let start = today
            .checked_sub_days(Days::new(self.n_days))
            .with_context(|| format!("{} days before {today} is out of range", self.n_days))?;
        DateWindow::try_new(start, today)
    }
}

#[instrument(skip_all, fields(plant = %args.plant))]
pub async fn status(args: &StatusArgs, api: &Plants) -> Result {
    let window = args.window()?;
    let statuses =
        api.get_device_statuses(args.plant, window).await?.iter().map(DeviceStatus::from).collect_vec();
    if statuses.is_empty() {
        warn!(%window, "no status records within the window");
        return Ok(());
    }
    println!("{}", build_status_table(&statuses));
    Ok(())
}
