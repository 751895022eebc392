use chrono::NaiveDate;
use clap::Parser;

use crate::{
    api::PlantDataSource,
    cli::WindowArgs,
    core::{
        comparison::{Comparison, ZeroBaseline},
        plant::PlantSet,
        window::DateWindow,
    },
    prelude::*,
    tables::build_comparison_table,
};

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    pub window: WindowArgs,

    /// First day of the previous window, defaults to the adjacent window of the same length.
    #[clap(long = "previous-start", requires = "previous_end")]
    pub previous_start: Option<NaiveDate>,

    /// Last day of the previous window.
    #[clap(long = "previous-end", requires = "previous_start")]
    pub previous_end: Option<NaiveDate>,
}

impl CompareArgs {
    pub fn windows(&self) -> Result<(DateWindow, DateWindow)> {
        let current = self.window.window()?;
        let previous = match (self.previous_start, self.previous_end) {
            (Some(start), Some(end)) => DateWindow::try_new(start, end)?,
            _ => current.previous()?,
        };
        Ok((current, previous))
    }
}

#[instrument(skip_all)]
pub async fn compare(
    args: &CompareArgs,
    source: &impl PlantDataSource,
    plants: PlantSet,
    policy: ZeroBaseline,
) -> Result {
    let (current, previous) = args.windows()?;
    info!(%current, %previous, "comparing…");
    let daily = source.fetch_daily(plants).await?;
    println!("{}", build_comparison_table(&Comparison::derive(&daily, current, previous, policy)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;

    fn parse(arguments: &[&str]) -> Result<CompareArgs> {
        let args = Args::try_parse_from(
            ["pvboard", "compare", "--start", "2024-05-10", "--end", "2024-05-16"]
                .iter()
                .chain(arguments),
        )?;
        match args.command {
            crate::cli::Command::Compare(args) => Ok(args),
            _ => bail!("expected the compare command"),
        }
    }

    #[test]
    fn test_adjacent_previous_window() -> Result {
        let (current, previous) = parse(&[])?.windows()?;
        assert_eq!(current.to_string(), "2024-05-10..=2024-05-16");
        assert_eq!(previous.to_string(), "2024-05-03..=2024-05-09");
        Ok(())
    }

    #[test]
    fn test_explicit_previous_window() -> Result {
        let (_, previous) =
            parse(&["--previous-start", "2024-04-01", "--previous-end", "2024-04-30"])?.windows()?;
        assert_eq!(previous.n_days(), 30);
        Ok(())
    }

    #[test]
    fn test_previous_window_requires_both_ends() {
        assert!(parse(&["--previous-start", "2024-04-01"]).is_err());
    }
}
