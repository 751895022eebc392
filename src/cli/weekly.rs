use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::{
    api::PlantDataSource,
    core::{
        comparison::{Comparison, ZeroBaseline},
        plant::PlantSet,
        series::ChartSeries,
        window::DateWindow,
    },
    prelude::*,
    tables::{build_change_series_table, build_comparison_table},
};

#[derive(Parser)]
pub struct WeeklyArgs {
    /// Last day of the period, defaults to the local today.
    #[clap(long = "today")]
    pub today: Option<NaiveDate>,

    /// Number of days in the period.
    #[clap(
        long = "days",
        default_value = "7",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub n_days: u64,
}

impl WeeklyArgs {
    /// The last days and the same number of days right before them.
    pub fn windows(&self) -> Result<(DateWindow, DateWindow)> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let current = DateWindow::last_days(today, self.n_days)?;
        Ok((current, current.previous()?))
    }
}

#[instrument(skip_all)]
pub async fn weekly(
    args: &WeeklyArgs,
    source: &impl PlantDataSource,
    plants: PlantSet,
    policy: ZeroBaseline,
) -> Result {
    let (current, previous) = args.windows()?;
    info!(%current, %previous, "comparing…");
    let daily = source.fetch_daily(plants).await?;
    println!("{}", build_comparison_table(&Comparison::derive(&daily, current, previous, policy)));

    let current_series = ChartSeries::from(&daily.filter(current));
    let previous_series = ChartSeries::from(&daily.filter(previous));
    let changes = current_series.percent_changes(&previous_series, policy);
    println!("{}", build_change_series_table(current_series.labels(), &changes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_ok() -> Result {
        let args = WeeklyArgs { today: NaiveDate::from_ymd_opt(2024, 5, 16), n_days: 7 };
        let (current, previous) = args.windows()?;
        assert_eq!(current.to_string(), "2024-05-10..=2024-05-16");
        assert_eq!(previous.to_string(), "2024-05-03..=2024-05-09");
        Ok(())
    }
}
