mod settings;

pub use settings::{Config, ReportSettings, SiteSettings};

use crate::error::{MatrixError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "ITEM_MATRIX_API_KEY";
pub const API_SECRET_ENV: &str = "ITEM_MATRIX_API_SECRET";

/// Get the config directory path (~/.item-matrix/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "item-matrix") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.item-matrix/
    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        MatrixError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".item-matrix"))
}

/// Load config.toml, with credentials overridden from the environment
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(MatrixError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let mut config = parse_config(&content)
        .map_err(|e| MatrixError::ConfigParse { path, source: e })?;

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        config.site.api_key = Some(key);
    }
    if let Ok(secret) = std::env::var(API_SECRET_ENV) {
        config.site.api_secret = Some(secret);
    }

    Ok(config)
}

pub fn parse_config(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[site]
url = "https://erp.example.com"
# api_key = "your-api-key"        # or set ITEM_MATRIX_API_KEY
# api_secret = "your-api-secret"  # or set ITEM_MATRIX_API_SECRET
timeout_secs = 30

[report]
invoice_doctype = "Sales Invoice"
line_doctype = "Sales Invoice Item"
collect_status_field = "custom_collect_status"
collect_status = "UnCollected"
salesperson_field = "sales_person"
page_length = 1000      # results at this size are flagged as possibly truncated
require_filters = true  # salesperson, from and to must all be given
"#;
