use clap::Parser;

use crate::{
    api::Plants,
    cli::WindowArgs,
    core::{
        device::output_devices,
        measure::{Variable, device_series},
        plant::Plant,
    },
    prelude::*,
    tables::build_measure_table,
};

#[derive(Parser)]
pub struct DeviceMeasuresArgs {
    #[clap(long = "plant", value_enum)]
    pub plant: Plant,

    /// Device ID, defaults to the first output device of the plant.
    #[clap(long = "device")]
    pub device_id: Option<u64>,

    #[clap(long = "variable", value_enum, default_value = "a-voltage")]
    pub variable: Variable,

    #[clap(flatten)]
    pub window: WindowArgs,
}

#[instrument(skip_all, fields(plant = %args.plant, variable = ?args.variable))]
pub async fn device_measures(args: &DeviceMeasuresArgs, api: &Plants) -> Result {
    let window = args.window.window()?;
    let device_id = match args.device_id {
        Some(device_id) => device_id,
        None => output_devices(api.get_devices().await?, args.plant)
            .into_iter()
            .find_map(|device| device.key.device_id)
            .with_context(|| format!("{} has no output devices", args.plant))?,
    };
    let measures = api.get_device_measures(args.plant, args.variable, window).await?;
    let series = device_series(&measures, device_id);
    if series.is_empty() {
        warn!(device_id, %window, "no measures of the device within the window");
        return Ok(());
    }
    info!(device_id, n_samples = series.len(), "selected");
    println!("{}", build_measure_table(args.variable, &series));
    Ok(())
}
