use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    api::plants::EnergySummary,
    core::{
        comparison::{Comparison, ZeroBaseline},
        device::Device,
        energy::WattHours,
        heatmap::{Heatmap, Shade},
        kpi::KpiSeries,
        measure::Variable,
        plant::Plant,
        series::ChartSeries,
        status::{DeviceStatus, StatusCode, StatusKind},
    },
    prelude::*,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn change_cell(percent_change: Option<f64>) -> Cell {
    percent_change.map_or_else(
        || Cell::new("n/a").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
        |change| {
            Cell::new(format!("{change:+.1}%"))
                .set_alignment(CellAlignment::Right)
                .fg(if change >= 0.0 { Color::Green } else { Color::Red })
        },
    )
}

fn optional_cell(value: Option<f64>, precision: usize) -> Cell {
    value.map_or_else(
        || Cell::new("").set_alignment(CellAlignment::Right),
        |value| Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right),
    )
}

fn timestamp_cell(timestamp: Option<NaiveDateTime>) -> Cell {
    timestamp.map_or_else(
        || Cell::new("n/a").add_attribute(Attribute::Dim),
        |timestamp| Cell::new(timestamp.format("%Y-%m-%d %H:%M")).add_attribute(Attribute::Dim),
    )
}

fn sparkline(values: &[WattHours]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let Some(max) = values.iter().max().copied().filter(|max| *max > WattHours::ZERO) else {
        return BARS[0].to_string().repeat(values.len());
    };
    values
        .iter()
        .map(|value| {
            #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let level = ((*value / max).clamp(0.0, 1.0) * 7.0).round() as usize;
            BARS[level]
        })
        .collect()
}

/// Daily production with a column per plant and the totals at the bottom.
pub fn build_production_table(series: &ChartSeries, divisor: f64) -> Result<Table> {
    let scaled = series.scaled(divisor)?;
    let totals = series.totals(divisor)?;

    let mut table = new_table();
    table.set_header(
        std::iter::once(Cell::new("Date"))
            .chain(scaled.keys().map(|plant| Cell::new(plant.name())))
            .collect_vec(),
    );
    for (index, label) in series.labels().iter().enumerate() {
        table.add_row(
            std::iter::once(Cell::new(label.format("%a %b %d")).add_attribute(Attribute::Dim))
                .chain(scaled.values().map(|values| {
                    Cell::new(format!("{:.3}", values[index])).set_alignment(CellAlignment::Right)
                }))
                .collect_vec(),
        );
    }
    table.add_row(
        std::iter::once(Cell::new("Total").add_attribute(Attribute::Bold))
            .chain(totals.values().map(|total| {
                Cell::new(format!("{total:.3}"))
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Bold)
            }))
            .collect_vec(),
    );
    Ok(table)
}

/// Current and previous totals per plant with the change between them.
pub fn build_comparison_table(comparison: &Comparison) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Plant", "Current", "Previous", "Change"]);
    for (plant, plant_comparison) in comparison.iter() {
        table.add_row(vec![
            Cell::new(plant.name()),
            Cell::new(plant_comparison.current_total).set_alignment(CellAlignment::Right),
            Cell::new(plant_comparison.previous_total)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            change_cell(plant_comparison.percent_change),
        ]);
    }
    table
}

/// Day-by-day change against the same position of the previous period.
pub fn build_change_series_table(
    labels: &[NaiveDate],
    changes: &BTreeMap<Plant, Vec<Option<f64>>>,
) -> Table {
    let mut table = new_table();
    table.set_header(
        std::iter::once(Cell::new("Date"))
            .chain(changes.keys().map(|plant| Cell::new(plant.name())))
            .collect_vec(),
    );
    for (index, label) in labels.iter().enumerate() {
        table.add_row(
            std::iter::once(Cell::new(label.format("%a %b %d")).add_attribute(Attribute::Dim))
                .chain(changes.values().map(|changes| change_cell(changes.get(index).copied().flatten())))
                .collect_vec(),
        );
    }
    table
}

/// Weekday rows by hour columns, shaded by the summed power.
pub fn build_heatmap_table(heatmap: &Heatmap) -> Table {
    let mut table = new_table();
    table.set_header(
        std::iter::once(Cell::new(""))
            .chain(heatmap.hours().iter().map(|hour| Cell::new(format!("{hour:02}"))))
            .collect_vec(),
    );
    for weekday in heatmap.weekdays() {
        table.add_row(
            std::iter::once(Cell::new(weekday).add_attribute(Attribute::Bold))
                .chain(heatmap.hours().iter().map(|hour| {
                    let value = heatmap.get(*weekday, *hour);
                    let shade = Shade::of(value);
                    let (r, g, b) = shade.rgb();
                    Cell::new(format!("{:.1}", value / 1000.0))
                        .set_alignment(CellAlignment::Right)
                        .bg(Color::Rgb { r, g, b })
                        .fg(if shade.level() >= 5 { Color::White } else { Color::Black })
                }))
                .collect_vec(),
        );
    }
    table
}

/// Weekly card per plant: energy of this and the last week, the change, and the daily trend.
pub fn build_summary_table(summaries: &[(Plant, EnergySummary)], policy: ZeroBaseline) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Plant", "This week", "Last week", "Change", "Trend"]);
    for (plant, summary) in summaries {
        table.add_row(vec![
            Cell::new(plant.name()).add_attribute(Attribute::Bold),
            Cell::new(summary.current_week_energy).set_alignment(CellAlignment::Right),
            Cell::new(summary.previous_week_energy)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            change_cell(summary.comparison(policy).percent_change),
            Cell::new(sparkline(&summary.sparkline())).fg(Color::Cyan),
        ]);
    }
    table
}

/// Inverter status records, coloured by the status group.
pub fn build_status_table(statuses: &[DeviceStatus]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Timestamp", "Device", "Code", "Status"]);
    for status in statuses {
        let color = match status.code.map(StatusCode::kind) {
            Some(StatusKind::Running) => Color::Green,
            Some(StatusKind::Standby) => Color::Yellow,
            Some(StatusKind::Shutdown) => Color::Red,
            Some(StatusKind::Other) | None => Color::Reset,
        };
        table.add_row(vec![
            timestamp_cell(status.timestamp),
            Cell::new(&status.device_name),
            Cell::new(status.value).set_alignment(CellAlignment::Right),
            Cell::new(status.description()).fg(color),
        ]);
    }
    table
}

/// Performance ratio and yield samples in chronological order.
pub fn build_kpi_table(series: &KpiSeries) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Timestamp", "Performance ratio", "Yield"]);
    for (timestamp, performance_ratio, yield_) in series.iter() {
        table.add_row(vec![
            timestamp_cell(Some(timestamp)),
            optional_cell(performance_ratio, 3),
            optional_cell(yield_, 2),
        ]);
    }
    table
}

pub fn build_devices_table(devices: &[Device]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name"]);
    for device in devices {
        table.add_row(vec![
            device
                .key
                .device_id
                .map_or_else(|| Cell::new("n/a").add_attribute(Attribute::Dim), Cell::new)
                .set_alignment(CellAlignment::Right),
            Cell::new(device.name()),
        ]);
    }
    table
}

/// Chronological samples of a single device variable.
pub fn build_measure_table(variable: Variable, series: &[(NaiveDateTime, f64)]) -> Table {
    let mut table = new_table();
    table.set_header(vec![Cell::new("Timestamp"), Cell::new(format!("{:?}, {}", variable, variable.unit()))]);
    for (timestamp, value) in series {
        table.add_row(vec![
            timestamp_cell(Some(*timestamp)),
            Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        daily::DailyPlantEnergy,
        device::Devices,
        kpi::Kpis,
        plant::PlantSet,
        reading::Readings,
        window::DateWindow,
    };

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[WattHours::ZERO, WattHours::ZERO]), "▁▁");
        assert_eq!(sparkline(&[WattHours(0.0), WattHours(50.0), WattHours(100.0)]), "▁▅█");
    }

    #[test]
    fn test_build_production_table_ok() -> Result {
        // language=JSON
        const READINGS: &str = r#"
            [
                { "key": { "datetime": "2024-05-11T09:00:00Z" }, "plantName": "GSBP", "dayEnergy": 2500 },
                { "key": { "datetime": "2024-05-10T09:00:00Z" }, "plantName": "GSBP", "dayEnergy": 1500 }
            ]
        "#;
        let readings = serde_json::from_str::<Readings>(READINGS)?.0;
        let daily = DailyPlantEnergy::normalize(&readings, PlantSet::only(Plant::Gsbp));
        let table = build_production_table(&ChartSeries::from(&daily), 1000.0)?.to_string();
        assert!(table.contains("1.500"), "{table}");
        assert!(table.contains("2.500"), "{table}");
        assert!(table.contains("4.000"), "{table}");
        Ok(())
    }

    #[test]
    fn test_build_comparison_table_empty_window() -> Result {
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).context("invalid date")?;
        let window = DateWindow::try_new(day, day)?;
        let comparison = Comparison::derive(
            &DailyPlantEnergy::empty(PlantSet::only(Plant::Gsbp)),
            window,
            window.previous()?,
            ZeroBaseline::Zero,
        );
        assert_eq!(comparison[Plant::Gsbp].current_total.to_string(), "0.000 kWh");
        let table = build_comparison_table(&comparison).to_string();
        assert!(!table.contains("-0.000"), "{table}");
        assert!(table.contains("+0.0%"), "{table}");
        Ok(())
    }

    #[test]
    fn test_build_status_table_ok() {
        let statuses = [
            DeviceStatus {
                timestamp: None,
                value: 512.0,
                code: StatusCode::from_measure(512.0),
                device_name: "Inverter 1".to_string(),
            },
            DeviceStatus { timestamp: None, value: 9.5, code: None, device_name: "Unknown".to_string() },
        ];
        let table = build_status_table(&statuses).to_string();
        assert!(table.contains("Grid-connected"), "{table}");
        assert!(table.contains("Unknown status"), "{table}");
        assert!(table.contains("Inverter 1"), "{table}");
    }

    #[test]
    fn test_build_kpi_table_ok() -> Result {
        // language=JSON
        const KPIS: &str = r#"
            [
                { "datetime": "2024-05-30T09:00:00Z", "key": { "kpiName": "Performance Ratio", "value": 0.8126 } },
                { "datetime": "2024-05-30T10:00:00Z", "key": { "kpiName": "Yield", "value": 3.5 } }
            ]
        "#;
        let kpis = serde_json::from_str::<Kpis>(KPIS)?.0;
        let day = NaiveDate::from_ymd_opt(2024, 5, 30).context("invalid date")?;
        let table = build_kpi_table(&KpiSeries::within(&kpis, DateWindow::try_new(day, day)?)).to_string();
        assert!(table.contains("2024-05-30 09:00"), "{table}");
        assert!(table.contains("0.813"), "{table}");
        assert!(table.contains("3.50"), "{table}");
        Ok(())
    }

    #[test]
    fn test_build_devices_table_ok() -> Result {
        // language=JSON
        const DEVICES: &str = r#"[{ "key": { "plantId": 49951765, "deviceId": 1010 }, "deviceName": "Inverter 1" }]"#;
        let devices = serde_json::from_str::<Devices>(DEVICES)?.0;
        let table = build_devices_table(&devices).to_string();
        assert!(table.contains("1010"), "{table}");
        assert!(table.contains("Inverter 1"), "{table}");
        Ok(())
    }

    #[test]
    fn test_build_measure_table_ok() -> Result {
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 14)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .context("invalid timestamp")?;
        let table = build_measure_table(Variable::AVoltage, &[(timestamp, 229.456)]).to_string();
        assert!(table.contains("AVoltage, V"), "{table}");
        assert!(table.contains("2024-05-14 09:30"), "{table}");
        assert!(table.contains("229.46"), "{table}");
        Ok(())
    }

    #[test]
    fn test_build_production_table_rejects_zero_divisor() {
        let daily = DailyPlantEnergy::empty(PlantSet::all());
        assert!(build_production_table(&ChartSeries::from(&daily), 0.0).is_err());
    }

    #[test]
    fn test_build_change_series_table_marks_undefined() -> Result {
        let labels = [NaiveDate::from_ymd_opt(2024, 5, 10).context("invalid date")?];
        let changes = BTreeMap::from([(Plant::Gsbp, vec![None])]);
        let table = build_change_series_table(&labels, &changes).to_string();
        assert!(table.contains("n/a"), "{table}");
        Ok(())
    }
}
