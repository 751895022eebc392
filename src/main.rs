#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod tables;

use std::sync::Arc;

use clap::{Parser, crate_version};

use crate::{
    cli::{
        Args,
        Command,
        compare,
        device_measures,
        devices,
        export,
        heatmap,
        kpis,
        production,
        status,
        summary,
        watch,
        weekly,
    },
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let plants = args.plants();
    let policy = args.zero_baseline;
    let api = args.api.new_client()?;

    match args.command {
        Command::Production(args) => production(&args, &api, plants).await?,
        Command::Compare(args) => compare(&args, &api, plants, policy).await?,
        Command::Weekly(args) => weekly(&args, &api, plants, policy).await?,
        Command::Heatmap(args) => heatmap(&args, &api).await?,
        Command::Summary => summary(&api, plants, policy).await?,
        Command::Watch(args) => watch(&args, Arc::new(api), plants, policy).await?,
        Command::Export(args) => export(&args, &api, plants, policy).await?,
        Command::Status(args) => status(&args, &api).await?,
        Command::Kpis(args) => kpis(&args, &api).await?,
        Command::Devices(args) => devices(&args, &api).await?,
        Command::DeviceMeasures(args) => device_measures(&args, &api).await?,
    }

    info!("done!");
    Ok(())
}
