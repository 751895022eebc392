use std::{sync::Arc, time::Duration};

use clap::Parser;
use tokio::{sync::mpsc, time::MissedTickBehavior};

use crate::{
    api::PlantDataSource,
    cli::WindowArgs,
    core::{
        comparison::{Comparison, ZeroBaseline},
        plant::PlantSet,
        staleness::{Latest, RequestSequence, Ticket},
        window::DateWindow,
    },
    prelude::*,
    tables::build_comparison_table,
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    pub window: WindowArgs,

    /// Refresh interval in seconds.
    #[clap(
        long = "interval-secs",
        default_value = "60",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub interval_secs: u64,

    /// Stop after printing this many fresh results.
    #[clap(long = "count")]
    pub count: Option<usize>,
}

impl WatchArgs {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Every tick spawns an independent fetch, a result is printed only if nothing newer is already shown.
#[instrument(skip_all)]
pub async fn watch<S: PlantDataSource + Send + 'static>(
    args: &WatchArgs,
    source: Arc<S>,
    plants: PlantSet,
    policy: ZeroBaseline,
) -> Result {
    let current = args.window.window()?;
    let previous = current.previous()?;
    let mut printed = 0;
    watch_with(source, current, previous, plants, policy, args.interval(), |comparison| {
        println!("{}", build_comparison_table(comparison));
        printed += 1;
        args.count.is_none_or(|count| printed < count)
    })
    .await
}

/// Refresh the comparison until `on_fresh` returns `false`.
async fn watch_with<S: PlantDataSource + Send + 'static>(
    source: Arc<S>,
    current: DateWindow,
    previous: DateWindow,
    plants: PlantSet,
    policy: ZeroBaseline,
    period: Duration,
    mut on_fresh: impl FnMut(&Comparison) -> bool,
) -> Result {
    let sequence = RequestSequence::default();
    let latest = Arc::new(Latest::<Comparison>::default());
    let (applied_sender, mut applied_receiver) = mpsc::unbounded_channel::<Ticket>();
    let mut shown: Option<Ticket> = None;

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let ticket = sequence.issue();
                let source = Arc::clone(&source);
                let latest = Arc::clone(&latest);
                let applied_sender = applied_sender.clone();
                tokio::spawn(async move {
                    match source.fetch_daily(plants).await {
                        Ok(daily) => {
                            let comparison = Comparison::derive(&daily, current, previous, policy);
                            if latest.offer(ticket, comparison) {
                                let _ = applied_sender.send(ticket);
                            } else {
                                debug!(?ticket, "discarded a stale result");
                            }
                        }
                        Err(error) => {
                            warn!(?ticket, "failed to refresh: {error:#}");
                        }
                    }
                });
            }
            Some(_) = applied_receiver.recv() => {
                if latest.ticket() == shown {
                    continue;
                }
                shown = latest.ticket();
                if let Some(comparison) = latest.get() && !on_fresh(&comparison) {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::core::{
        energy::WattHours,
        plant::Plant,
        reading::{RawReading, Readings},
    };

    /// Production grows with every fetch.
    #[derive(Default)]
    struct Growing(AtomicUsize);

    #[async_trait]
    impl PlantDataSource for Growing {
        async fn fetch_readings(&self) -> Result<Vec<RawReading>> {
            let n_fetches = self.0.fetch_add(1, Ordering::Relaxed) + 1;
            let readings = format!(
                r#"[{{ "key": {{ "datetime": "2024-05-10T09:00:00Z" }}, "plantName": "GSBP", "dayEnergy": {n_fetches} }}]"#,
            );
            Ok(serde_json::from_str::<Readings>(&readings)?.0)
        }
    }

    #[tokio::test]
    async fn test_watch_prints_fresh_results() -> Result {
        let day = chrono::NaiveDate::from_ymd_opt(2024, 5, 10).context("invalid date")?;
        let current = DateWindow::try_new(day, day)?;
        let source = Arc::new(Growing::default());

        let mut seen = Vec::new();
        watch_with(
            Arc::clone(&source),
            current,
            current.previous()?,
            PlantSet::only(Plant::Gsbp),
            ZeroBaseline::Zero,
            Duration::from_millis(1),
            |comparison| {
                seen.push(comparison[Plant::Gsbp].current_total);
                seen.len() < 3
            },
        )
        .await?;

        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|total| *total >= WattHours(1.0)), "{seen:?}");
        Ok(())
    }
}
