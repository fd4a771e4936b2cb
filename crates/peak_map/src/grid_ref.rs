use crate::constants::{EASTING_RANGE, GRID_REF_MIN_LEN, NORTHING_RANGE};
use crate::error::GridRefError;

/// Decoded grid reference: easting/northing digits, square letters dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRef {
    pub easting: i32,
    pub northing: i32,
}

impl GridRef {
    /// Parses e.g. `NY215805` into easting 215 / northing 805.
    ///
    /// The two leading grid-square letters are not interpreted. Anything
    /// after the 8th character is ignored.
    pub fn parse(value: &str) -> Result<Self, GridRefError> {
        if value.chars().count() < GRID_REF_MIN_LEN {
            return Err(GridRefError::TooShort(value.to_string()));
        }

        let easting = parse_digits(value, EASTING_RANGE, "easting")?;
        let northing = parse_digits(value, NORTHING_RANGE, "northing")?;
        Ok(Self { easting, northing })
    }
}

fn parse_digits(
    value: &str,
    range: std::ops::Range<usize>,
    axis: &'static str,
) -> Result<i32, GridRefError> {
    let digits: String = value
        .chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect();

    // no sign handling: digits only
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GridRefError::NotNumeric {
            value: value.to_string(),
            axis,
            digits,
        });
    }

    digits.parse().map_err(|_| GridRefError::NotNumeric {
        value: value.to_string(),
        axis,
        digits,
    })
}
