use crate::peaks::PeakRecord;

use log::warn;
use std::fmt;

/// Padded bounding box of all peak coordinates (map units).
///
/// Always has a non-zero extent on both axes as long as the margin is
/// positive, even for a single peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl MapBounds {
    /// Bounding box of `points` expanded by `margin` on every side.
    ///
    /// With no points the box is the margin square around the origin.
    pub fn from_points<I>(points: I, margin: f64) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut it = points.into_iter();
        let Some((x0, y0)) = it.next() else {
            warn!("No peaks loaded; using an empty map around the origin");
            return Self {
                min_x: -margin,
                min_y: -margin,
                max_x: margin,
                max_y: margin,
            };
        };

        let (min_x, min_y, max_x, max_y) = it.fold((x0, y0, x0, y0), |(lx, ly, hx, hy), (x, y)| {
            (lx.min(x), ly.min(y), hx.max(x), hy.max(y))
        });

        Self {
            min_x: min_x as f64 - margin,
            min_y: min_y as f64 - margin,
            max_x: max_x as f64 + margin,
            max_y: max_y as f64 + margin,
        }
    }

    pub fn from_peaks(peaks: &[PeakRecord], margin: f64) -> Self {
        Self::from_points(peaks.iter().map(|p| (p.x, p.y)), margin)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Map-unit length along x -> fraction of the map width
    #[inline]
    pub fn normalize_width(&self, w: f64) -> f64 {
        w / self.width()
    }

    /// Map-unit length along y -> fraction of the map height
    #[inline]
    pub fn normalize_height(&self, h: f64) -> f64 {
        h / self.height()
    }

    #[inline]
    pub fn normalize_x(&self, x: f64) -> f64 {
        (x - self.min_x) / self.width()
    }

    /// Y axis flipped: map north is up, canvas rows grow downwards.
    #[inline]
    pub fn normalize_y(&self, y: f64) -> f64 {
        1.0 - (y - self.min_y) / self.height()
    }

    #[inline]
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (self.normalize_x(x), self.normalize_y(y))
    }
}

/// `min_x min_y max_x max_y`
impl fmt::Display for MapBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x.round() as i64,
            self.min_y.round() as i64,
            self.max_x.round() as i64,
            self.max_y.round() as i64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn sample() -> MapBounds {
        MapBounds::from_points([(100, 400), (200, 500), (300, 600)], 50.0)
    }

    #[test]
    fn test_bounds_include_margin() {
        let b = sample();
        assert_eq!(b.min_x, 50.0);
        assert_eq!(b.min_y, 350.0);
        assert_eq!(b.max_x, 350.0);
        assert_eq!(b.max_y, 650.0);
        assert_eq!(b.to_string(), "50 350 350 650");
    }

    #[test]
    fn test_normalize_x_edges() {
        let b = sample();
        assert!(b.normalize_x(b.min_x).abs() < EPS);
        assert!((b.normalize_x(b.max_x) - 1.0).abs() < EPS);
        assert!(b.normalize_x(200.0) > b.normalize_x(100.0));
        assert!(b.normalize_x(200.0) < b.normalize_x(300.0));
        assert!((b.normalize_x(200.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_normalize_y_is_flipped() {
        let b = sample();
        assert!((b.normalize_y(b.min_y) - 1.0).abs() < EPS);
        assert!(b.normalize_y(b.max_y).abs() < EPS);

        let ys = [350.0, 400.0, 500.0, 600.0, 650.0];
        for pair in ys.windows(2) {
            assert!(b.normalize_y(pair[1]) < b.normalize_y(pair[0]));
        }
        assert_eq!(b.normalize(200.0, 500.0), (0.5, 0.5));
    }

    #[test]
    fn test_normalize_lengths() {
        let b = MapBounds::from_points([(0, 0), (200, 100)], 50.0);
        assert!((b.normalize_width(3.0) - 0.01).abs() < EPS);
        assert!((b.normalize_height(4.0) - 0.02).abs() < EPS);
    }

    #[test]
    fn test_single_point_has_extent() {
        let b = MapBounds::from_points([(215, 805)], 50.0);
        assert!(b.max_x > b.min_x);
        assert!(b.max_y > b.min_y);
        assert_eq!(b.normalize(215.0, 805.0), (0.5, 0.5));
    }

    #[test]
    fn test_empty_falls_back_to_origin_box() {
        let b = MapBounds::from_points(std::iter::empty(), 50.0);
        assert_eq!(b.to_string(), "-50 -50 50 50");
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 100.0);
    }
}
