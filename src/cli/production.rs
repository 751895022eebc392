use clap::Parser;

use crate::{
    api::PlantDataSource,
    cli::{UnitArgs, WindowArgs},
    core::{plant::PlantSet, series::ChartSeries},
    prelude::*,
    tables::build_production_table,
};

#[derive(Parser)]
pub struct ProductionArgs {
    #[clap(flatten)]
    pub window: WindowArgs,

    #[clap(flatten)]
    pub unit: UnitArgs,
}

#[instrument(skip_all)]
pub async fn production(
    args: &ProductionArgs,
    source: &impl PlantDataSource,
    plants: PlantSet,
) -> Result {
    let window = args.window.window()?;
    let daily = source.fetch_daily(plants).await?.filter(window);
    if daily.is_empty() {
        warn!(%window, "no readings within the window");
    }
    let series = ChartSeries::from(&daily);
    println!("{}", build_production_table(&series, args.unit.divisor)?);
    Ok(())
}
