use crate::error::ScoutError;
use crate::models::ListingRecord;
use chrono::{Local, NaiveDate};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

const FILE_SUFFIX: &str = "_flats.csv";

/// Result of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub saved: usize,
    pub file_name: String,
    pub path: PathBuf,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved listings: {}", self.saved)?;
        write!(f, "Data file: {}", self.file_name)
    }
}

/// `<date>_flats.csv`
pub fn file_name_for(date: NaiveDate) -> String {
    format!("{}{}", date.format("%Y-%m-%d"), FILE_SUFFIX)
}

/// Write today's export into `output_dir`
pub fn export_listings(output_dir: &Path, listings: &[ListingRecord]) -> Result<ExportSummary, ScoutError> {
    export_listings_on(output_dir, Local::now().date_naive(), listings)
}

/// Write `listings` in insertion order to `<output_dir>/<date>_flats.csv`.
/// An existing file for the same date is overwritten.
pub fn export_listings_on(
    output_dir: &Path,
    date: NaiveDate,
    listings: &[ListingRecord],
) -> Result<ExportSummary, ScoutError> {
    std::fs::create_dir_all(output_dir)?;

    let file_name = file_name_for(date);
    let path = output_dir.join(&file_name);

    let mut writer = csv::Writer::from_path(&path)?;
    if listings.is_empty() {
        // serialize() only emits the header alongside the first row
        writer.write_record(["id", "price", "link", "uuid", "room", "square"])?;
    }
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;

    info!("💾 Saved {} listings to {}", listings.len(), path.display());

    Ok(ExportSummary {
        saved: listings.len(),
        file_name,
        path,
    })
}
