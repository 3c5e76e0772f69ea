use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            api_secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SiteSettings {
    /// `token key:secret`, only when both halves are present
    pub fn auth_token(&self) -> Option<String> {
        match (self.api_key.as_deref(), self.api_secret.as_deref()) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(format!("token {key}:{secret}"))
            }
            _ => None,
        }
    }
}

/// Doctype and field names the report queries against.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReportSettings {
    #[serde(default = "default_invoice_doctype")]
    pub invoice_doctype: String,
    #[serde(default = "default_line_doctype")]
    pub line_doctype: String,
    #[serde(default = "default_collect_status_field")]
    pub collect_status_field: String,
    #[serde(default = "default_collect_status")]
    pub collect_status: String,
    #[serde(default = "default_salesperson_field")]
    pub salesperson_field: String,
    #[serde(default = "default_page_length")]
    pub page_length: usize,
    #[serde(default = "default_require_filters")]
    pub require_filters: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            invoice_doctype: default_invoice_doctype(),
            line_doctype: default_line_doctype(),
            collect_status_field: default_collect_status_field(),
            collect_status: default_collect_status(),
            salesperson_field: default_salesperson_field(),
            page_length: default_page_length(),
            require_filters: default_require_filters(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_invoice_doctype() -> String {
    "Sales Invoice".to_string()
}

fn default_line_doctype() -> String {
    "Sales Invoice Item".to_string()
}

fn default_collect_status_field() -> String {
    "custom_collect_status".to_string()
}

fn default_collect_status() -> String {
    "UnCollected".to_string()
}

fn default_salesperson_field() -> String {
    "sales_person".to_string()
}

fn default_page_length() -> usize {
    1000
}

fn default_require_filters() -> bool {
    true
}
