use super::ui;
use crate::core::rate::pair_history;
use crate::core::{CurrencyCode, CurrencyPair, RateProvider, RateSeries};
use crate::store::CodeRegistry;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Duration, NaiveDate};
use comfy_table::Cell;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryReport {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub points: Vec<HistoryPoint>,
}

impl HistoryReport {
    pub fn from_series(pair: &CurrencyPair, series: &RateSeries) -> Self {
        let points = pair_history(series, &pair.to)
            .into_iter()
            .map(|(date, rate)| HistoryPoint { date, rate })
            .collect();
        HistoryReport {
            from: pair.from.clone(),
            to: pair.to.clone(),
            points,
        }
    }

    pub fn min(&self) -> Option<&HistoryPoint> {
        self.points.iter().min_by(|a, b| a.rate.total_cmp(&b.rate))
    }

    pub fn max(&self) -> Option<&HistoryPoint> {
        self.points.iter().max_by(|a, b| a.rate.total_cmp(&b.rate))
    }

    /// Percentage change from the first to the last point.
    pub fn change(&self) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if first.rate == 0.0 {
            return None;
        }
        Some((last.rate - first.rate) / first.rate * 100.0)
    }

    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell(&format!("{}/{}", self.from, self.to)),
        ]);
        for point in &self.points {
            table.add_row(vec![Cell::new(point.date), ui::rate_cell(point.rate)]);
        }
        if let (Some(min), Some(max)) = (self.min(), self.max()) {
            table.add_row(vec![
                Cell::new(format!("Low ({})", min.date)),
                ui::rate_cell(min.rate),
            ]);
            table.add_row(vec![
                Cell::new(format!("High ({})", max.date)),
                ui::rate_cell(max.rate),
            ]);
        }
        if let Some(change) = self.change() {
            table.add_row(vec![Cell::new("Change"), ui::change_cell(change)]);
        }
        table.to_string()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history to {}", path.display()))?;
        Ok(())
    }
}

/// First and last day of a window of `days` days ending on `end`.
pub fn window(end: NaiveDate, days: u32) -> Result<(NaiveDate, NaiveDate)> {
    if days == 0 {
        bail!("History needs at least one day");
    }
    let start = end
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .ok_or_else(|| anyhow!("History window of {days} days is out of range"))?;
    Ok((start, end))
}

pub async fn run(
    pair: &CurrencyPair,
    days: u32,
    output: Option<&Path>,
    registry: &CodeRegistry,
    provider: &(dyn RateProvider + Send + Sync),
) -> Result<HistoryReport> {
    let (start, end) = window(chrono::Local::now().date_naive(), days)?;

    let pb = ui::new_spinner("Fetching rate history...");
    let result = futures::try_join!(
        super::validate_pair(pair, registry, provider),
        provider.rate_series(&pair.from, start, end)
    );
    pb.finish_and_clear();
    let (_, series) = result?;

    let report = HistoryReport::from_series(pair, &series);
    if report.points.is_empty() {
        bail!("No rates for {} between {} and {}", pair.to, start, end);
    }

    println!(
        "\n{}",
        ui::style_text(
            &format!("{} -> {} from {} to {}", pair.from, pair.to, start, end),
            ui::StyleType::Title
        )
    );
    println!("{}", report.display_as_table());

    if let Some(path) = output {
        report.write_json(path)?;
        println!("Wrote history to {}", path.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_report() -> HistoryReport {
        let mut series = RateSeries::new();
        for (day, rate) in [("2024-01-02", 0.95), ("2024-01-01", 1.0), ("2024-01-03", 1.1)] {
            series.insert(date(day), RateTable::from([("EUR".to_string(), rate)]));
        }
        HistoryReport::from_series(&"USD,EUR".parse().unwrap(), &series)
    }

    #[test]
    fn test_window_covers_requested_days() {
        let (start, end) = window(date("2024-03-30"), 30).unwrap();
        assert_eq!(start, date("2024-03-01"));
        assert_eq!(end, date("2024-03-30"));

        let (start, end) = window(date("2024-03-30"), 1).unwrap();
        assert_eq!(start, end);

        assert!(window(date("2024-03-30"), 0).is_err());
    }

    #[test]
    fn test_window_too_large_is_an_error() {
        let err = window(date("2026-10-19"), 200_000_000).unwrap_err();
        assert_eq!(
            err.to_string(),
            "History window of 200000000 days is out of range"
        );
    }

    #[test]
    fn test_report_statistics() {
        let report = sample_report();
        assert_eq!(report.points.len(), 3);
        assert_eq!(report.points[0].date, date("2024-01-01"));
        assert_eq!(report.min().unwrap().rate, 0.95);
        assert_eq!(report.max().unwrap().date, date("2024-01-03"));
        assert!((report.change().unwrap() - 10.0).abs() < 1e-9);

        let rendered = report.display_as_table();
        assert!(rendered.contains("2024-01-02"));
        assert!(rendered.contains("USD/EUR"));
    }

    #[test]
    fn test_report_json_file() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("out").join("history.json");
        let report = sample_report();

        report.write_json(&path)?;

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(value["from"], "USD");
        assert_eq!(value["to"], "EUR");
        assert_eq!(value["points"][0]["date"], "2024-01-01");
        assert_eq!(value["points"][2]["rate"], 1.1);
        Ok(())
    }

    #[test]
    fn test_empty_report_has_no_change() {
        let report = HistoryReport {
            from: "USD".parse().unwrap(),
            to: "EUR".parse().unwrap(),
            points: vec![],
        };
        assert!(report.change().is_none());
        assert!(report.min().is_none());
    }
}
