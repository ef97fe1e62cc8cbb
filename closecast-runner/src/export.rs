//! CSV export of the raw feature matrix.

use closecast_core::{Bar, FeatureMatrix, FeatureSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV writer flush failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("row {row} references bar {index}, but only {len} bars were given")]
    MissingBar { row: usize, index: usize, len: usize },
}

/// Render `matrix` as CSV: `date`, one column per feature, then `label`.
///
/// `bars` must be the slice the matrix was built from.
pub fn features_to_csv(
    matrix: &FeatureMatrix,
    feature_set: FeatureSet,
    bars: &[Bar],
) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["date"];
    header.extend_from_slice(feature_set.names());
    header.push("label");
    wtr.write_record(&header)?;

    for (k, ((row, label), &index)) in matrix
        .rows
        .iter()
        .zip(&matrix.labels)
        .zip(&matrix.indices)
        .enumerate()
    {
        let bar = bars.get(index).ok_or(ExportError::MissingBar {
            row: k,
            index,
            len: bars.len(),
        })?;
        let mut record = Vec::with_capacity(row.len() + 2);
        record.push(bar.date.to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        record.extend(label.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
