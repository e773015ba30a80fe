use thiserror::Error;

/// Fatal outcomes of an analysis run. Any of these aborts the pipeline before
/// a partial result is handed back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("No usable data: every row was empty or had an unparsable date")]
    NoUsableData,

    #[error("Nothing to aggregate for '{0}'")]
    EmptyAggregate(String),

    #[error("Forecast needs at least {needed} periods of history, got {available}")]
    InsufficientHistory { needed: usize, available: usize },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No valid data found in the CSV file")]
    Empty,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}
