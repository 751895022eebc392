use clap::Parser;

use crate::{
    api::Plants,
    cli::WindowArgs,
    core::{heatmap::Heatmap, plant::Plant},
    prelude::*,
    tables::build_heatmap_table,
};

#[derive(Parser)]
pub struct HeatmapArgs {
    #[clap(long = "plant", value_enum)]
    pub plant: Plant,

    #[clap(flatten)]
    pub window: WindowArgs,
}

#[instrument(skip_all, fields(plant = %args.plant))]
pub async fn heatmap(args: &HeatmapArgs, api: &Plants) -> Result {
    let window = args.window.window()?;
    let measures = api.get_power_measures(args.plant, window).await?;
    let heatmap = Heatmap::from_measures(&measures);
    if heatmap.is_empty() {
        warn!(%window, "no power measures within the window");
        return Ok(());
    }
    if let Some((weekday, hour, power)) = heatmap.peak() {
        info!(%weekday, hour, power, "peak");
    }
    println!("{}", build_heatmap_table(&heatmap));
    Ok(())
}
