use crate::constants::{CIRCLE_HEADER, GRID_REF_HEADER, NAME_HEADER, TRIANGLE_HEADER};
use crate::error::{PeakMapError, Result};
use crate::peaks::{BaggedSet, PeakRecord, ShapeKind};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::io::Read;
use std::path::Path;

/// Options shared by both table readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Column positions of the peaks table, located by header name.
#[derive(Debug, Clone, Copy)]
struct PeakColumns {
    grid_ref: usize,
    name: usize,
    triangle: Option<usize>,
    circle: Option<usize>,
}

/// Reads the peaks table (`GridRef`, `Name`, optional `Triangle`/`Circle`).
///
/// # Errors
/// Returns error if the file cannot be opened, a required column is missing
/// or a grid reference cannot be decoded.
pub fn read_peaks_csv<P: AsRef<Path>>(path: P, opt: &CsvOptions) -> Result<Vec<PeakRecord>> {
    let path = path.as_ref();
    let file = open(path)?;
    read_peaks_from_reader(file, opt, path)
}

/// Reads the bagged table (`GridRef`) into a lookup set.
pub fn read_bagged_csv<P: AsRef<Path>>(path: P, opt: &CsvOptions) -> Result<BaggedSet> {
    let path = path.as_ref();
    let file = open(path)?;
    read_bagged_from_reader(file, opt, path)
}

/// `source` only labels errors.
pub fn read_peaks_from_reader<R: Read>(
    reader: R,
    opt: &CsvOptions,
    source: &Path,
) -> Result<Vec<PeakRecord>> {
    let mut rdr = reader_builder(opt).from_reader(reader);
    let headers = read_headers(&mut rdr, source)?;

    let cols = PeakColumns {
        grid_ref: require_column(&headers, GRID_REF_HEADER, source)?,
        name: require_column(&headers, NAME_HEADER, source)?,
        triangle: find_column(&headers, TRIANGLE_HEADER),
        circle: find_column(&headers, CIRCLE_HEADER),
    };
    debug!("{}: columns {:?}", source.display(), cols);

    let mut peaks = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result.map_err(|e| csv_error(source, e))?;
        let row = i + 2; // 1-indexed, +1 for header

        if let Some(peak) = parse_peak_record(&rec, &cols, row, source)? {
            peaks.push(peak);
        }
    }
    Ok(peaks)
}

pub fn read_bagged_from_reader<R: Read>(
    reader: R,
    opt: &CsvOptions,
    source: &Path,
) -> Result<BaggedSet> {
    let mut rdr = reader_builder(opt).from_reader(reader);
    let headers = read_headers(&mut rdr, source)?;
    let grid_ref = require_column(&headers, GRID_REF_HEADER, source)?;

    let mut bagged = BaggedSet::new();
    for result in rdr.records() {
        let rec = result.map_err(|e| csv_error(source, e))?;
        match rec.get(grid_ref) {
            Some(value) if !value.is_empty() => {
                bagged.insert(value.to_string());
            }
            _ => continue,
        }
    }
    Ok(bagged)
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| PeakMapError::OpenFile {
        path: path.to_path_buf(),
        source,
    })
}

fn reader_builder(opt: &CsvOptions) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(opt.delimiter)
        .trim(Trim::Headers) // field values are kept as written
        .flexible(true); // allow short rows and additional columns
    builder
}

fn csv_error(path: &Path, source: csv::Error) -> PeakMapError {
    PeakMapError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn read_headers<R: Read>(rdr: &mut csv::Reader<R>, source: &Path) -> Result<StringRecord> {
    rdr.headers().cloned().map_err(|e| csv_error(source, e))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn require_column(headers: &StringRecord, name: &'static str, source: &Path) -> Result<usize> {
    find_column(headers, name).ok_or_else(|| PeakMapError::MissingColumn {
        path: source.to_path_buf(),
        column: name,
    })
}

fn parse_peak_record(
    rec: &StringRecord,
    cols: &PeakColumns,
    row: usize,
    source: &Path,
) -> Result<Option<PeakRecord>> {
    if rec.iter().all(|f| f.trim().is_empty()) {
        return Ok(None);
    }

    let grid_ref = rec.get(cols.grid_ref).unwrap_or("");
    let name = rec.get(cols.name).unwrap_or("");
    let shape = ShapeKind::from_markers(
        cols.triangle.and_then(|c| rec.get(c)),
        cols.circle.and_then(|c| rec.get(c)),
    );

    PeakRecord::new(grid_ref, name, shape)
        .map(Some)
        .map_err(|e| PeakMapError::GridRef {
            path: source.to_path_buf(),
            row,
            source: e,
        })
}
