//! Load investment snapshots from JSON or CSV exports

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use super::{Investment, InvestmentRecord};
use crate::error::AccrualError;

/// A JSON document holding either one investment or an array of them
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonBook {
    Many(Vec<InvestmentRecord>),
    One(InvestmentRecord),
}

/// Load investments from a JSON file (single object or array)
pub fn load_investments_json<P: AsRef<Path>>(path: P) -> Result<Vec<Investment>, AccrualError> {
    let file = File::open(path)?;
    load_investments_json_from_reader(BufReader::new(file))
}

pub fn load_investments_json_from_reader<R: Read>(reader: R) -> Result<Vec<Investment>, AccrualError> {
    let records = match serde_json::from_reader(reader)? {
        JsonBook::Many(records) => records,
        JsonBook::One(record) => vec![record],
    };
    records.into_iter().map(Investment::try_from).collect()
}

/// Load investments from a CSV file with camelCase headers
pub fn load_investments_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Investment>, AccrualError> {
    let file = File::open(path)?;
    load_investments_csv_from_reader(file)
}

/// Load investments from any reader (e.g., string buffer, network stream)
pub fn load_investments_csv_from_reader<R: Read>(reader: R) -> Result<Vec<Investment>, AccrualError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut investments = Vec::new();

    for result in csv_reader.deserialize() {
        let record: InvestmentRecord = result?;
        investments.push(Investment::try_from(record)?);
    }

    Ok(investments)
}
