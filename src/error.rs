use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Structural failures of an input table. These abort the run; row-level
/// conditions (blank names, no candidates) are outcomes, not errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{table} table: no name column found (tried known labels, then any header containing \"name\")")]
    NameColumn { table: &'static str },
    #[error("{table} table: no address columns found (tried known column groups, then address-like header patterns)")]
    AddressColumns { table: &'static str },
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv parse error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export error: {0}")]
    Csv(String),
    #[error("xlsx export error: {0}")]
    Xlsx(String),
}
