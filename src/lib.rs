pub mod config;
pub mod error;
pub mod frappe;
pub mod matrix;
pub mod render;

pub use config::{Config, ReportSettings, SiteSettings};
pub use error::{MatrixError, Result};
pub use frappe::{Condition, FrappeClient, ListQuery, ListSource, Operator};
pub use matrix::{item_columns, Filter, MatrixBuilder, Row, NO_ITEM_CODE, UNKNOWN_CUSTOMER};
pub use render::{render, OutputFormat};
