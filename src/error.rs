use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Browser session could not be started: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("Browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
