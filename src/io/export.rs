//! CSV export for the derived KPI views.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::hierarchy::{LevelBreakdown, MonthlyKpiPoint, ZoneBalance};

/// Column header for the consumption-by-level export.
const BREAKDOWN_HEADER: &str = "level,consumption_m3,meter_count,percentage";

/// Column header for the monthly series export.
const MONTHLY_HEADER: &str = "month,a1_main_source,a2_zone_distribution,a3_individual,\
                              stage1_loss,stage2_loss,system_efficiency";

/// Column header for the zone balance export.
const ZONES_HEADER: &str = "zone,zone_bulk,individual_total,difference,loss_percentage,\
                            zone_bulk_meters,individual_meters";

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

fn header(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim)
}

/// Exports the level breakdown to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_breakdown(rows: &[LevelBreakdown], path: &Path) -> io::Result<()> {
    write_breakdown_csv(rows, create(path)?)
}

/// Writes the level breakdown as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_breakdown_csv(rows: &[LevelBreakdown], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header(BREAKDOWN_HEADER))?;
    for r in rows {
        wtr.write_record(&[
            r.level.clone(),
            format!("{:.2}", r.consumption),
            r.meter_count.to_string(),
            format!("{:.2}", r.percentage),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the monthly series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly(points: &[MonthlyKpiPoint], path: &Path) -> io::Result<()> {
    write_monthly_csv(points, create(path)?)
}

/// Writes the monthly series as CSV to any writer, one row per month.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(points: &[MonthlyKpiPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header(MONTHLY_HEADER))?;
    for p in points {
        wtr.write_record(&[
            p.month.clone(),
            format!("{:.2}", p.a1_main_source),
            format!("{:.2}", p.a2_zone_distribution),
            format!("{:.2}", p.a3_individual),
            format!("{:.2}", p.stage1_loss),
            format!("{:.2}", p.stage2_loss),
            format!("{:.2}", p.system_efficiency),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports zone balances to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_zones(zones: &[ZoneBalance], path: &Path) -> io::Result<()> {
    write_zones_csv(zones, create(path)?)
}

/// Writes zone balances as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_zones_csv(zones: &[ZoneBalance], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header(ZONES_HEADER))?;
    for z in zones {
        wtr.write_record(&[
            z.zone.clone(),
            format!("{:.2}", z.zone_bulk),
            format!("{:.2}", z.individual_total),
            format!("{:.2}", z.difference),
            format!("{:.2}", z.loss_percentage),
            z.zone_bulk_meters.to_string(),
            z.individual_meters.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
