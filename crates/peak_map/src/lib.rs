pub mod bounds;
pub mod config;
pub mod constants;
pub mod csv_reader;
pub mod error;
pub mod grid_ref;
pub mod peaks;
pub mod render;

pub use bounds::MapBounds;
pub use config::{MapStyle, font_path_from_env};
pub use constants::{
    CIRCLE_RADIUS, DEFAULT_CANVAS_SIZE, FONT_SIZE, LINE_WIDTH, MARGIN, TRIANGLE_WIDTH,
};
pub use csv_reader::{CsvOptions, read_bagged_csv, read_peaks_csv};
pub use error::{ErrorKind, GridRefError, PeakMapError};
pub use grid_ref::GridRef;
pub use peaks::{BaggedSet, PeakRecord, PeakTable, ShapeKind, mark_bagged};
pub use render::{Renderer, load_font, render_map};
