use crate::bounds::MapBounds;
use crate::config::MapStyle;
use crate::csv_reader::{CsvOptions, read_bagged_csv, read_peaks_csv};
use crate::error::Result;
use crate::grid_ref::GridRef;

use log::{debug, info};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Grid references of the peaks already climbed.
pub type BaggedSet = HashSet<String>;

/// How a peak is drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    /// major peak
    Triangle,
    /// minor peak
    Circle,
    /// neither marker column set; not drawn
    #[default]
    Unset,
}

impl ShapeKind {
    /// Resolves the kind from the optional marker cells of a row.
    /// A `Triangle` marker wins if both are filled in.
    pub fn from_markers(triangle: Option<&str>, circle: Option<&str>) -> Self {
        let filled = |cell: Option<&str>| cell.is_some_and(|v| !v.trim().is_empty());
        if filled(triangle) {
            ShapeKind::Triangle
        } else if filled(circle) {
            ShapeKind::Circle
        } else {
            ShapeKind::Unset
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Unset => "-",
        };
        f.pad(s)
    }
}

/// One row of the peaks table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakRecord {
    pub grid_ref: String,
    pub name: String,
    pub shape: ShapeKind,
    pub x: i32,
    pub y: i32,
    pub bagged: bool,
}

impl PeakRecord {
    /// Builds a record, decoding `x`/`y` from the grid reference.
    pub fn new(
        grid_ref: impl Into<String>,
        name: impl Into<String>,
        shape: ShapeKind,
    ) -> std::result::Result<Self, crate::error::GridRefError> {
        let grid_ref = grid_ref.into();
        let GridRef { easting, northing } = GridRef::parse(&grid_ref)?;
        Ok(Self {
            grid_ref,
            name: name.into(),
            shape,
            x: easting,
            y: northing,
            bagged: false,
        })
    }
}

/// Sets `bagged` on every peak whose grid reference is in `bagged`.
///
/// Matching is exact: no case folding or whitespace normalization.
/// Returns the number of peaks marked.
pub fn mark_bagged(peaks: &mut [PeakRecord], bagged: &BaggedSet) -> usize {
    let mut marked = 0;
    for peak in peaks.iter_mut() {
        peak.bagged = bagged.contains(&peak.grid_ref);
        if peak.bagged {
            marked += 1;
        }
    }
    marked
}

/// All peaks in input order together with the padded map extent.
#[derive(Debug, Clone)]
pub struct PeakTable {
    pub peaks: Vec<PeakRecord>,
    pub bounds: MapBounds,
}

impl PeakTable {
    pub fn new(peaks: Vec<PeakRecord>, margin: f64) -> Self {
        let bounds = MapBounds::from_peaks(&peaks, margin);
        Self { peaks, bounds }
    }

    /// Loads both tables, joins the bagged status and computes the bounds.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        peaks_path: P,
        bagged_path: Q,
        csv: &CsvOptions,
        style: &MapStyle,
    ) -> Result<Self> {
        let mut peaks = read_peaks_csv(&peaks_path, csv)?;
        info!(
            "Loaded {} peaks from {}",
            peaks.len(),
            peaks_path.as_ref().display()
        );

        let bagged = read_bagged_csv(&bagged_path, csv)?;
        info!(
            "Loaded {} bagged grid references from {}",
            bagged.len(),
            bagged_path.as_ref().display()
        );

        let marked = mark_bagged(&mut peaks, &bagged);
        info!("{} of {} peaks bagged", marked, peaks.len());
        if marked < bagged.len() {
            debug!(
                "{} bagged grid references matched no peak",
                bagged.len() - marked
            );
        }

        Ok(Self::new(peaks, style.margin))
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeakRecord> {
        self.peaks.iter()
    }

    pub fn bagged_count(&self) -> usize {
        self.peaks.iter().filter(|p| p.bagged).count()
    }
}

/// Plain-text table: `GridRef Name Shape x y bagged`, one row per peak.
impl fmt::Display for PeakTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_w = self
            .peaks
            .iter()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());
        let ref_w = self
            .peaks
            .iter()
            .map(|p| p.grid_ref.chars().count())
            .max()
            .unwrap_or(0)
            .max("GridRef".len());

        writeln!(
            f,
            "{:<ref_w$}  {:<name_w$}  {:<8}  {:>5}  {:>5}  {}",
            "GridRef", "Name", "Shape", "x", "y", "bagged"
        )?;
        for p in &self.peaks {
            writeln!(
                f,
                "{:<ref_w$}  {:<name_w$}  {:<8}  {:>5}  {:>5}  {}",
                p.grid_ref,
                p.name,
                p.shape,
                p.x,
                p.y,
                if p.bagged { "True" } else { "False" }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(grid_ref: &str, name: &str, shape: ShapeKind) -> PeakRecord {
        PeakRecord::new(grid_ref, name, shape).unwrap()
    }

    #[test]
    fn test_shape_from_markers() {
        assert_eq!(ShapeKind::from_markers(Some("x"), None), ShapeKind::Triangle);
        assert_eq!(ShapeKind::from_markers(None, Some("1")), ShapeKind::Circle);
        assert_eq!(ShapeKind::from_markers(Some(""), Some("1")), ShapeKind::Circle);
        assert_eq!(ShapeKind::from_markers(Some(" "), Some("")), ShapeKind::Unset);
        assert_eq!(ShapeKind::from_markers(None, None), ShapeKind::Unset);
        assert_eq!(ShapeKind::from_markers(Some("y"), Some("y")), ShapeKind::Triangle);
    }

    #[test]
    fn test_new_decodes_coordinates() {
        let p = peak("NY215805", "Helvellyn", ShapeKind::Triangle);
        assert_eq!((p.x, p.y), (215, 805));
        assert!(!p.bagged);
    }

    #[test]
    fn test_mark_bagged_exact_match() {
        let mut peaks = vec![
            peak("NY215805", "Helvellyn", ShapeKind::Triangle),
            peak("NY321123", "Skiddaw", ShapeKind::Circle),
        ];
        let bagged: BaggedSet = ["NY321123".to_string()].into_iter().collect();

        assert_eq!(mark_bagged(&mut peaks, &bagged), 1);
        assert!(!peaks[0].bagged);
        assert!(peaks[1].bagged);
    }

    #[test]
    fn test_mark_bagged_is_case_sensitive() {
        let mut peaks = vec![peak("NY321123", "Skiddaw", ShapeKind::Circle)];
        let bagged: BaggedSet = ["ny321123".to_string()].into_iter().collect();

        assert_eq!(mark_bagged(&mut peaks, &bagged), 0);
        assert!(!peaks[0].bagged);
    }

    #[test]
    fn test_mark_bagged_ignores_padded_entries() {
        let mut peaks = vec![peak("NY321123", "Skiddaw", ShapeKind::Circle)];
        let bagged: BaggedSet = ["  NY321123  ".to_string(), "NY321123 ".to_string()]
            .into_iter()
            .collect();

        assert_eq!(mark_bagged(&mut peaks, &bagged), 0);
        assert!(!peaks[0].bagged);
    }

    #[test]
    fn test_mark_bagged_resets_stale_flags() {
        let mut peaks = vec![peak("NY321123", "Skiddaw", ShapeKind::Circle)];
        peaks[0].bagged = true;
        assert_eq!(mark_bagged(&mut peaks, &BaggedSet::new()), 0);
        assert!(!peaks[0].bagged);
    }

    #[test]
    fn test_table_display() {
        let mut peaks = vec![
            peak("NY215805", "Helvellyn", ShapeKind::Triangle),
            peak("NY321123", "Skiddaw", ShapeKind::Circle),
        ];
        peaks[1].bagged = true;
        let table = PeakTable::new(peaks, 50.0);
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("GridRef"));
        assert!(lines[0].trim_end().ends_with("bagged"));
        assert!(lines[1].contains("Helvellyn"));
        assert!(lines[1].contains("215"));
        assert!(lines[1].contains("805"));
        assert!(lines[1].trim_end().ends_with("False"));
        assert!(lines[2].contains("Skiddaw"));
        assert!(lines[2].trim_end().ends_with("True"));
        assert_eq!(table.bagged_count(), 1);
    }
}
