//! Delivery sheet export.
//!
//! Pure formatting over an already prepared [`Settlement`]: a header row, one
//! row per settled customer, a blank separator and the totals row.

use std::{fs, io, path::Path};

use chrono::NaiveDate;
use csv::Writer;

use crate::{EngineError, ResultEngine, Settlement};

pub const HEADERS: [&str; 7] = [
    "Nombre",
    "RUT",
    "Teléfono",
    "Dirección",
    "Comuna",
    "Cajas",
    "Monto",
];

const FILE_PREFIX: &str = "reparto";
const FILE_EXTENSION: &str = "csv";

/// `reparto_<zone>_<dd-mm-YYYY>.csv`, or `reparto_<dd-mm-YYYY>.csv` when the
/// run is not filtered by zone.
#[must_use]
pub fn file_name(zone: Option<&str>, date: NaiveDate) -> String {
    let date = date.format("%d-%m-%Y");
    match zone.map(zone_token).filter(|token| !token.is_empty()) {
        Some(token) => format!("{FILE_PREFIX}_{token}_{date}.{FILE_EXTENSION}"),
        None => format!("{FILE_PREFIX}_{date}.{FILE_EXTENSION}"),
    }
}

fn zone_token(zone: &str) -> String {
    zone.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

/// Writes the sheet of `settlement` into any writer.
pub fn write_sheet<W: io::Write>(writer: W, settlement: &Settlement) -> Result<(), csv::Error> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(HEADERS)?;
    for row in &settlement.rows {
        writer.write_record(row.cells())?;
    }
    writer.write_record([""; 7])?;
    writer.write_record(settlement.total_cells())?;
    writer.flush()?;
    Ok(())
}

/// Writes the sheet of `settlement` to `path`, replacing any previous file.
pub fn write(path: &Path, settlement: &Settlement) -> ResultEngine<()> {
    let export_error = |source: csv::Error| EngineError::ExportWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(|err| export_error(err.into()))?;
    write_sheet(file, settlement).map_err(export_error)?;
    tracing::info!(path = %path.display(), rows = settlement.rows.len(), "wrote delivery sheet");
    Ok(())
}
