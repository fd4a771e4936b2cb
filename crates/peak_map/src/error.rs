use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PeakMapError>;

/// Why a grid reference could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridRefError {
    #[error("grid reference '{0}' is shorter than 8 characters")]
    TooShort(String),

    #[error("grid reference '{value}' has a non-numeric {axis} '{digits}'")]
    NotNumeric {
        value: String,
        axis: &'static str,
        digits: String,
    },
}

/// Broad class of a failure, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataLoad,
    Parse,
    Render,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::DataLoad => "Data load",
            ErrorKind::Parse => "Parse",
            ErrorKind::Render => "Render",
            ErrorKind::Config => "Config",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum PeakMapError {
    #[error("Failed to open {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing '{column}' column in {path}")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Invalid grid reference in {path} at row {row}")]
    GridRef {
        path: PathBuf,
        row: usize,
        #[source]
        source: GridRefError,
    },

    #[error("Failed to save image to {path}")]
    SaveImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("No usable system font found; pass --font or set PEAK_MAP_FONT")]
    NoFont,

    #[error("Failed to load font {path}: {message}")]
    Font { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PeakMapError {
    pub fn kind(&self) -> ErrorKind {
        use PeakMapError::*;
        match self {
            OpenFile { .. } | Csv { .. } | MissingColumn { .. } => ErrorKind::DataLoad,
            GridRef { .. } => ErrorKind::Parse,
            SaveImage { .. } | NoFont => ErrorKind::Render,
            Font { .. } | ConfigError(_) => ErrorKind::Config,
        }
    }
}

impl From<toml::de::Error> for PeakMapError {
    fn from(err: toml::de::Error) -> Self {
        PeakMapError::ConfigError(format!("TOML parse error: {}", err))
    }
}
