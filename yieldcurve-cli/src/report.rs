//! Human-facing output: summary table and CSV export.

use anyhow::Result;
use std::path::Path;
use yieldcurve_core::data::AcquisitionSummary;
use yieldcurve_core::domain::MATURITY_FORMAT;
use yieldcurve_core::PreparedSeries;

pub fn print_summary(summary: &AcquisitionSummary, ron: &PreparedSeries, eur: &PreparedSeries) {
    println!();
    println!("=== Yield Curves ===");
    println!("Instruments:    {}", summary.total);
    println!("From cache:     {}", summary.from_cache);
    println!("Fetched:        {}", summary.fetched);
    println!("Without yield:  {}", summary.missing);

    for series in [ron, eur] {
        println!();
        println!("--- {} ({} points) ---", series.currency, series.len());
        if series.is_empty() {
            println!("(none)");
            continue;
        }
        println!("{:<12} {:<12} {:>8}", "Maturity", "Code", "YTM");
        println!("{}", "-".repeat(34));
        for p in &series.points {
            println!(
                "{:<12} {:<12} {:>7.2}%",
                p.maturity.format(MATURITY_FORMAT).to_string(),
                p.code,
                p.ytm
            );
        }
    }
    println!();
}

/// Write all points as `currency;maturity;code;ytm;label`.
pub fn export_csv(path: &Path, series: &[&PreparedSeries]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    wtr.write_record(["currency", "maturity", "code", "ytm", "label"])?;
    for s in series {
        for p in &s.points {
            wtr.write_record([
                s.currency.as_str(),
                &p.maturity.format("%Y-%m-%d").to_string(),
                &p.code,
                &format!("{:.4}", p.ytm),
                &p.label,
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
