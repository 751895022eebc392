use clap::Parser;

use crate::{
    api::Plants,
    core::{device::output_devices, plant::Plant},
    prelude::*,
    tables::build_devices_table,
};

#[derive(Parser)]
pub struct DevicesArgs {
    #[clap(long = "plant", value_enum)]
    pub plant: Plant,
}

#[instrument(skip_all, fields(plant = %args.plant))]
pub async fn devices(args: &DevicesArgs, api: &Plants) -> Result {
    let devices = output_devices(api.get_devices().await?, args.plant);
    info!(n_devices = devices.len(), "output devices");
    println!("{}", build_devices_table(&devices));
    Ok(())
}
