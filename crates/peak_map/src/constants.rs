/// Map padding around the outermost peaks (map units)
pub const MARGIN: f64 = 50.0;

/// Symbol sizes (map units, normalized against the map width)
pub const TRIANGLE_WIDTH: f64 = 3.0;
pub const CIRCLE_RADIUS: f64 = 1.5;
pub const LINE_WIDTH: f64 = 0.5;

/// Label size (map units, normalized against the map height)
pub const FONT_SIZE: f64 = 4.0;

/// Output canvas side length [px]
pub const DEFAULT_CANVAS_SIZE: u32 = 2000;
pub const MAX_CANVAS_SIZE: u32 = 16384;

/// Grid reference layout: 2 square letters, 3 easting digits, 3 northing digits
pub const GRID_REF_MIN_LEN: usize = 8;
pub const EASTING_RANGE: std::ops::Range<usize> = 2..5;
pub const NORTHING_RANGE: std::ops::Range<usize> = 5..8;

/// Expected headers in CSV files
pub const GRID_REF_HEADER: &str = "GridRef";
pub const NAME_HEADER: &str = "Name";
pub const TRIANGLE_HEADER: &str = "Triangle";
pub const CIRCLE_HEADER: &str = "Circle";

/// Environment variable naming the label font file
pub const ENV_FONT_PATH: &str = "PEAK_MAP_FONT";
