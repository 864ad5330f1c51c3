use std::fmt;

#[derive(Debug)]
pub enum ConsolidateError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad factor, missing column mapping, etc.).
    ConfigValidation(String),
    /// Missing required column in an input table.
    MissingColumn { source: String, column: String },
    /// Two catalog rows derive the same join key with different unit prices.
    CatalogConflict { key: String, first: f64, second: f64 },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ConsolidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::CatalogConflict { key, first, second } => {
                write!(
                    f,
                    "catalog key '{key}' maps to conflicting unit prices ({first} vs {second})"
                )
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ConsolidateError {}
