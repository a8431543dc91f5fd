pub mod browser;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod spreadsheet;
pub mod table;
pub mod types;

pub use error::{Result, ScraperError};
pub use types::RawEventRecord;
