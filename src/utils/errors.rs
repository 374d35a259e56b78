use thiserror::Error;

/// Errors raised by the charting capability
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Unknown chart package: {0}")]
    UnknownPackage(String),
    #[error("Chart library load was interrupted before it signalled ready")]
    LoadInterrupted,
    #[error("Column {index} ({label}) expects {expected} values")]
    ColumnType {
        index: usize,
        label: String,
        expected: &'static str,
    },
    #[error("Row has {actual} cells but the table declares {expected} columns")]
    RowWidth { expected: usize, actual: usize },
    #[error("Line chart needs a datetime column first")]
    MissingDomainColumn,
    #[error("Nothing to draw: table has no rows or no value columns")]
    EmptyTable,
    #[error("Render failed: {0}")]
    Render(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    EmptyValue(&'static str),
}
