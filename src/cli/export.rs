use std::path::PathBuf;

use clap::Parser;

use crate::{
    api::PlantDataSource,
    cli::{UnitArgs, WindowArgs},
    core::{
        comparison::{Comparison, ZeroBaseline},
        plant::PlantSet,
        report::ProductionReport,
        series::ChartSeries,
    },
    prelude::*,
};

#[derive(Parser)]
pub struct ExportArgs {
    #[clap(flatten)]
    pub window: WindowArgs,

    #[clap(flatten)]
    pub unit: UnitArgs,

    /// Report file path.
    #[clap(long = "output", default_value = "report.toml")]
    pub output: PathBuf,
}

#[instrument(skip_all, fields(output = %args.output.display()))]
pub async fn export(
    args: &ExportArgs,
    source: &impl PlantDataSource,
    plants: PlantSet,
    policy: ZeroBaseline,
) -> Result {
    let current_window = args.window.window()?;
    let previous_window = current_window.previous()?;
    let daily = source.fetch_daily(plants).await?;
    let report = ProductionReport::builder()
        .divisor(args.unit.divisor)
        .current_window(current_window)
        .previous_window(previous_window)
        .totals(ChartSeries::from(&daily.filter(current_window)).totals(args.unit.divisor)?)
        .comparison(Comparison::derive(&daily, current_window, previous_window, policy))
        .build();
    let report = report.to_toml().context("failed to serialize the report")?;
    std::fs::write(&args.output, report)
        .with_context(|| format!("failed to write `{}`", args.output.display()))?;
    info!("exported");
    Ok(())
}
