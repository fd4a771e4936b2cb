use crate::constants::{
    CIRCLE_RADIUS, DEFAULT_CANVAS_SIZE, ENV_FONT_PATH, FONT_SIZE, LINE_WIDTH, MARGIN,
    MAX_CANVAS_SIZE, TRIANGLE_WIDTH,
};
use crate::error::{PeakMapError, Result};

use serde::{Deserialize, Serialize};
use std::{env, path::Path, path::PathBuf};

/// Drawing parameters. Lengths are in map units unless noted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapStyle {
    /// padding added around the outermost peaks
    pub margin: f64,
    pub triangle_width: f64,
    pub circle_radius: f64,
    /// triangle outline width
    pub line_width: f64,
    pub font_size: f64,
    /// output side length [px]
    pub canvas_size: u32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            margin: MARGIN,
            triangle_width: TRIANGLE_WIDTH,
            circle_radius: CIRCLE_RADIUS,
            line_width: LINE_WIDTH,
            font_size: FONT_SIZE,
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }
}

impl MapStyle {
    /// Loads a TOML style file; missing keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PeakMapError::ConfigError(format!(
                "Failed to read style file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let style: MapStyle = toml::from_str(&content)?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("margin", self.margin),
            ("triangle_width", self.triangle_width),
            ("circle_radius", self.circle_radius),
            ("line_width", self.line_width),
            ("font_size", self.font_size),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(PeakMapError::ConfigError(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !(1..=MAX_CANVAS_SIZE).contains(&self.canvas_size) {
            return Err(PeakMapError::ConfigError(format!(
                "canvas_size must be between 1 and {} pixels, got {}",
                MAX_CANVAS_SIZE, self.canvas_size
            )));
        }
        Ok(())
    }
}

/// Label font path from `PEAK_MAP_FONT`, ignoring blank values.
pub fn font_path_from_env() -> Option<PathBuf> {
    env::var(ENV_FONT_PATH)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_style(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_style() {
        let style = MapStyle::default();
        assert_eq!(style.margin, 50.0);
        assert_eq!(style.triangle_width, 3.0);
        assert_eq!(style.circle_radius, 1.5);
        assert_eq!(style.line_width, 0.5);
        assert_eq!(style.font_size, 4.0);
        assert_eq!(style.canvas_size, 2000);
        assert!(style.validate().is_ok());
    }

    #[test]
    fn test_load_partial_style() {
        let file = write_style("margin = 20.0\ncanvas_size = 800\n");
        let style = MapStyle::load_from_file(file.path()).unwrap();
        assert_eq!(style.margin, 20.0);
        assert_eq!(style.canvas_size, 800);
        assert_eq!(style.circle_radius, 1.5);
    }

    #[test]
    fn test_load_rejects_zero_margin() {
        let file = write_style("margin = 0.0\n");
        let err = MapStyle::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, PeakMapError::ConfigError(msg) if msg.contains("margin")));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let file = write_style("margn = 10.0\n");
        assert!(MapStyle::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = MapStyle::load_from_file("no/such/style.toml").unwrap_err();
        assert!(matches!(err, PeakMapError::ConfigError(_)));
    }

    #[test]
    fn test_validate_zero_canvas() {
        let style = MapStyle {
            canvas_size: 0,
            ..Default::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_validate_canvas_upper_bound() {
        let at_max = MapStyle {
            canvas_size: MAX_CANVAS_SIZE,
            ..Default::default()
        };
        assert!(at_max.validate().is_ok());

        let huge = MapStyle {
            canvas_size: u32::MAX,
            ..Default::default()
        };
        let err = huge.validate().unwrap_err();
        assert!(matches!(err, PeakMapError::ConfigError(msg) if msg.contains("canvas_size")));
    }
}
