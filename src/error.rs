use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Config directory not found at {0}. Run 'item-matrix init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("No site URL configured. Set [site] url in config.toml or pass --site.")]
    NoSite,

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Unexpected response from {doctype} list: {reason}")]
    Decode { doctype: String, reason: String },

    #[error("Invalid --{flag} date '{value}'. Expected YYYY-MM-DD.")]
    InvalidDate { flag: String, value: String },

    #[error("Invalid date range: from {from} is after to {to}")]
    InvalidRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    #[error("Missing required filter(s): {}. Set report.require_filters = false to allow partial filters.", .0.join(", "))]
    MissingFilters(Vec<&'static str>),

    #[error("Invalid --format value: '{0}'. Use 'table', 'json', or 'csv'.")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
