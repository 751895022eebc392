use clap::Parser;

use crate::{
    api::Plants,
    cli::WindowArgs,
    core::kpi::{KpiKind, KpiSeries},
    prelude::*,
    tables::build_kpi_table,
};

#[derive(Parser)]
pub struct KpisArgs {
    #[clap(flatten)]
    pub window: WindowArgs,
}

#[instrument(skip_all)]
pub async fn kpis(args: &KpisArgs, api: &Plants) -> Result {
    let window = args.window.window()?;
    let series = KpiSeries::within(&api.get_kpis().await?, window);
    if series.is_empty() {
        warn!(%window, "no KPIs within the window");
        return Ok(());
    }
    debug!(
        n_performance_ratios = series.values(KpiKind::PerformanceRatio).len(),
        n_yields = series.values(KpiKind::Yield).len(),
        "filtered",
    );
    println!("{}", build_kpi_table(&series));
    Ok(())
}
