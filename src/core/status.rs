use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_with::serde_as;

use crate::core::measure::Measure;

/// Response of the inverter status endpoint.
#[must_use]
#[serde_as]
#[derive(Deserialize)]
pub struct StatusPage {
    #[serde_as(as = "serde_with::VecSkipError<_>")]
    #[serde(rename = "measuresWithDevices", default)]
    pub records: Vec<StatusRecord>,
}

#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct StatusRecord {
    pub measure: Measure,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "deviceInfo", default)]
    pub device_info: Option<DeviceInfo>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeviceInfo {
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(rename = "deviceName", default)]
    pub device_name: Option<String>,
}

/// Inverter running status as reported in the status measures.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StatusCode(pub u32);

/// Coarse grouping of the status codes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StatusKind {
    Standby,
    Running,
    Shutdown,
    Other,
}

impl StatusCode {
    /// Take the raw measure value if it is an exact code.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_measure(value: f64) -> Option<Self> {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let code = value as u32;
        (f64::from(code) == value).then_some(Self(code))
    }

    #[must_use]
    pub const fn description(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "Standby: initializing",
            1 => "Standby: insulation resistance detecting",
            2 => "Standby: irradiation detecting",
            3 => "Standby: grid detecting",
            256 => "Start",
            512 => "Grid-connected",
            513 => "Grid-connected: power limited",
            514 => "Grid-connected: self-derating",
            515 => "Off-grid operation",
            768 => "Shutdown: on fault",
            769 => "Shutdown: on command",
            770 => "Shutdown: OVGR",
            771 => "Shutdown: communication interrupted",
            772 => "Shutdown: power limited",
            773 => "Shutdown: manual startup required",
            774 => "Shutdown: DC switch disconnected",
            775 => "Shutdown: rapid shutdown",
            776 => "Shutdown: input underpower",
            777 => "Shutdown: NS protection",
            778 => "Shutdown: commanded rapid shutdown",
            1025 => "Grid scheduling: cosφ-P curve",
            1026 => "Grid scheduling: Q-U curve",
            1027 => "Power grid scheduling: PF-U characteristic curve",
            1028 => "Grid scheduling: dry contact",
            1029 => "Power grid scheduling: Q-P characteristic curve",
            1280 => "Ready for terminal test",
            1281 => "Terminal testing...",
            1536 => "Inspection in progress",
            1792 => "AFCI self-check",
            2048 => "I-V scanning",
            2304 => "DC input detection",
            2560 => "Off-grid charging",
            40960 => "Standby: no irradiation",
            40961 => "Standby: no DC input",
            45056 => "Communication interrupted (written by SmartLogger)",
            49152 => "Loading... (written by SmartLogger)",
            _ => return None,
        })
    }

    #[must_use]
    pub const fn kind(self) -> StatusKind {
        match self.0 {
            0..=3 | 40960 | 40961 => StatusKind::Standby,
            256 | 512..=515 | 1025..=1029 => StatusKind::Running,
            768..=778 => StatusKind::Shutdown,
            _ => StatusKind::Other,
        }
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description().unwrap_or("Unknown status"))
    }
}

/// A status grid row.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceStatus {
    pub timestamp: Option<NaiveDateTime>,
    pub value: f64,
    pub code: Option<StatusCode>,
    pub device_name: String,
}

impl From<&StatusRecord> for DeviceStatus {
    fn from(record: &StatusRecord) -> Self {
        Self {
            timestamp: record.measure.key.timestamp(),
            value: record.measure.measure,
            code: StatusCode::from_measure(record.measure.measure),
            device_name: record
                .device_info
                .as_ref()
                .and_then(|info| info.device_name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

impl DeviceStatus {
    #[must_use]
    pub fn description(&self) -> String {
        self.code.map_or_else(|| "Unknown status".to_string(), |code| code.to_string())
    }
}
