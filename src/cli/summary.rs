use crate::{
    api::Plants,
    core::{comparison::ZeroBaseline, plant::PlantSet},
    prelude::*,
    tables::build_summary_table,
};

#[instrument(skip_all)]
pub async fn summary(api: &Plants, plants: PlantSet, policy: ZeroBaseline) -> Result {
    let mut summaries = Vec::with_capacity(plants.len());
    for plant in plants {
        summaries.push((plant, api.get_energy_summary(plant).await?));
    }
    println!("{}", build_summary_table(&summaries, policy));
    Ok(())
}
