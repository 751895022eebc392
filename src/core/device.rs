use serde::Deserialize;
use serde_with::serde_as;

use crate::core::plant::Plant;

/// Inverter or sensor attached to a plant.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Device {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub key: DeviceKey,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "deviceName", default)]
    pub name: Option<String>,
}

#[serde_as]
#[derive(Copy, Clone, Debug, Default, Deserialize)]
pub struct DeviceKey {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "plantId", default)]
    pub plant_id: Option<u64>,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "deviceId", default)]
    pub device_id: Option<u64>,
}

#[must_use]
#[serde_as]
#[derive(Deserialize, derive_more::IntoIterator)]
pub struct Devices(#[serde_as(as = "serde_with::VecSkipError<_>")] pub Vec<Device>);

impl Device {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Whether the device belongs to the plant and measures its output.
    #[must_use]
    pub fn is_output_of(&self, plant: Plant) -> bool {
        self.key.plant_id == Some(plant.station_id())
            && self.key.device_id.is_some()
            && !plant.auxiliary_devices().contains(&self.name())
    }
}

/// Output devices of the plant in the order they were listed.
pub fn output_devices(devices: Vec<Device>, plant: Plant) -> Vec<Device> {
    devices.into_iter().filter(|device| device.is_output_of(plant)).collect()
}
