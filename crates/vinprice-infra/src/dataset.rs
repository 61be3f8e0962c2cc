//! CSV loader for the historical sales dataset
//!
//! Files exported from the auction system are usually UTF-8, but older
//! exports come out as Windows-1252; both are accepted.

use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use thiserror::Error;
use tracing::{debug, warn};

use vinprice_domain::model::VehicleRecord;

pub const COL_VIN: &str = "VIN";
pub const COL_YEAR: &str = "Lot Year";
pub const COL_MAKE: &str = "Lot Make";
pub const COL_MODEL: &str = "Lot Model";
pub const COL_SALE_PRICE: &str = "Sale Price";
pub const COL_RUN_CONDITION: &str = "Lot Run Condition";
pub const COL_TITLE_TYPE: &str = "Sale Title Type";
pub const COL_DAMAGE: &str = "Damage Type Description";
pub const COL_ODOMETER: &str = "Odometer Reading";
pub const COL_FUEL_TYPE: &str = "Lot Fuel Type";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_VIN,
    COL_YEAR,
    COL_MAKE,
    COL_MODEL,
    COL_SALE_PRICE,
    COL_RUN_CONDITION,
    COL_TITLE_TYPE,
    COL_DAMAGE,
    COL_ODOMETER,
    COL_FUEL_TYPE,
];

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    NotFound(String),

    #[error("Failed to read dataset: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

impl From<DatasetError> for vinprice_types::Error {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::NotFound(_) | DatasetError::MissingColumn(_) => {
                vinprice_types::Error::MissingData(err.to_string())
            }
            DatasetError::IoError(e) => vinprice_types::Error::Io(e),
            DatasetError::CsvError(e) => vinprice_types::Error::Csv(e),
        }
    }
}

/// Parsed dataset rows
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<VehicleRecord>,
    /// Rows left out because VIN, year or sale price was blank, or a
    /// numeric cell was not a number
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load the sales dataset from a CSV file
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }
    let bytes = fs::read(path)?;
    let dataset = parse_dataset(&bytes)?;
    debug!(
        path = %path.display(),
        records = dataset.len(),
        skipped = dataset.skipped_rows,
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse dataset CSV bytes
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => std::borrow::Cow::Borrowed(text),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("Some characters could not be decoded from Windows-1252");
            } else {
                warn!("Dataset is not UTF-8; decoded as Windows-1252");
            }
            decoded
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut dataset = Dataset::default();
    for (row_idx, result) in reader.records().enumerate() {
        let row_num = row_idx + 2; // header is row 1
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(row = row_num, error = %e, "skipping unreadable row");
                dataset.skipped_rows += 1;
                continue;
            }
        };
        match columns.parse(&record) {
            Some(vehicle) => dataset.records.push(vehicle),
            None => {
                debug!(row = row_num, "skipping row with missing or invalid required cells");
                dataset.skipped_rows += 1;
            }
        }
    }

    Ok(dataset)
}

/// Positions of the required columns in the header row
struct ColumnIndex {
    idx: [usize; 10],
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let mut idx = [0usize; 10];
        for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        }
        Ok(Self { idx })
    }

    fn text<'r>(&self, record: &'r csv::StringRecord, col: usize) -> Option<&'r str> {
        record.get(self.idx[col]).filter(|s| !s.is_empty())
    }

    /// Descriptive cell; blank or absent reads as empty
    fn optional_text(&self, record: &csv::StringRecord, col: usize) -> String {
        self.text(record, col).unwrap_or_default().to_string()
    }

    /// Only VIN, year and sale price are needed for a comparable. A blank
    /// odometer is kept as `None`; an odometer that is not a number is not.
    fn parse(&self, record: &csv::StringRecord) -> Option<VehicleRecord> {
        let year = parse_number(self.text(record, 1)?)?;
        if year.fract() != 0.0 {
            return None;
        }
        let odometer = match self.text(record, 8) {
            Some(cell) => Some(parse_number(cell)?),
            None => None,
        };
        Some(VehicleRecord {
            vin: self.text(record, 0)?.to_string(),
            year: year as i32,
            make: self.optional_text(record, 2),
            model: self.optional_text(record, 3),
            sale_price: parse_number(self.text(record, 4)?)?,
            run_condition: self.optional_text(record, 5),
            title_type: self.optional_text(record, 6),
            damage_description: self.optional_text(record, 7),
            odometer,
            fuel_type: self.optional_text(record, 9),
        })
    }
}

/// Parse a number, tolerating a leading `$` and thousands separators
fn parse_number(s: &str) -> Option<f64> {
    let cleaned = s.trim().trim_start_matches('$').replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "VIN,Lot Year,Lot Make,Lot Model,Sale Price,Lot Run Condition,Sale Title Type,Damage Type Description,Odometer Reading,Lot Fuel Type";

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number("12500"), Some(12500.0));
        assert_eq!(parse_number("$12,500.50"), Some(12500.5));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_rows_are_trimmed_and_parsed() {
        let csv = format!(
            "{}\n 1HGBH41JXMN109186 , 2019.0 , Honda , Accord ,\"11,000\",Run & Drive,Clean,Front End,42000,Gas\n",
            HEADER
        );
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        let record = &dataset.records[0];
        assert_eq!(record.vin, "1HGBH41JXMN109186");
        assert_eq!(record.year, 2019);
        assert_eq!(record.make, "Honda");
        assert_eq!(record.sale_price, 11000.0);
        assert_eq!(record.odometer, Some(42000.0));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let csv = format!(
            "{}\n\
             1HGBH41JXMN109186,2019,Honda,Accord,11000,Run & Drive,Clean,Front End,42000,Gas\n\
             1HGBH41J00000000,2019,Honda,Accord,,Run & Drive,Clean,Front End,42000,Gas\n\
             1HGBH41J11111111,abc,Honda,Accord,9000,Run & Drive,Clean,Front End,42000,Gas\n\
             1HGBH41J22222222,2019,Honda\n",
            HEADER
        );
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped_rows, 3);
    }

    #[test]
    fn test_blank_descriptive_cells_keep_the_row() {
        let csv = format!(
            "{}\n\
             1HGBH41JXMN109186,2019,Honda,Accord,11000,,Clean,,,\n\
             1HGBH41J33333333,2019,Honda,Accord,9000,Run & Drive,Clean,Front End,lots,Gas\n",
            HEADER
        );
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped_rows, 1);

        let record = &dataset.records[0];
        assert_eq!(record.sale_price, 11000.0);
        assert_eq!(record.run_condition, "");
        assert_eq!(record.damage_description, "");
        assert_eq!(record.fuel_type, "");
        assert_eq!(record.odometer, None);
    }

    #[test]
    fn test_columns_may_be_reordered_and_extra() {
        let csv = "Lot Fuel Type,Extra,VIN,Lot Year,Lot Make,Lot Model,Sale Price,Lot Run Condition,Sale Title Type,Damage Type Description,Odometer Reading\n\
                   Gas,x,1HGBH41JXMN109186,2019,Honda,Accord,11000,Run & Drive,Clean,Front End,42000\n";
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records[0].fuel_type, "Gas");
        assert_eq!(dataset.records[0].model, "Accord");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "VIN,Lot Year,Lot Make\n1HGBH41JXMN109186,2019,Honda\n";
        let err = parse_dataset(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "Lot Model"));
        assert!(matches!(
            vinprice_types::Error::from(err),
            vinprice_types::Error::MissingData(_)
        ));
    }

    #[test]
    fn test_header_only_dataset_is_empty() {
        let dataset = parse_dataset(format!("{}\n", HEADER).as_bytes()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_windows_1252_is_decoded() {
        let mut bytes = format!("{}\n", HEADER).into_bytes();
        bytes.extend_from_slice(b"1HGBH41JXMN109186,2019,Citro\xEBn,C4,9000,Run & Drive,Clean,Front End,1000,Gas\n");
        let dataset = parse_dataset(&bytes).unwrap();
        assert_eq!(dataset.records[0].make, "Citro\u{eb}n");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_dataset("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(
            file,
            "2T1BURHE0JC000001,2018,Toyota,Camry,15000,Run & Drive,Clean,Hail,30000,Gas"
        )
        .unwrap();
        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
    }
}
