//! Order-log analytics for a supply-chain dashboard.
//!
//! Raw CSV rows are validated and cleaned into typed records, then reduced to
//! grouped means, calendar-period series and a short trend forecast. The
//! result is one owned [`Analysis`] value; rendering it is up to the caller.
pub mod aggregate;
pub mod config;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod output;
pub mod reports;
pub mod series;
pub mod types;
pub mod util;

pub use error::{AnalysisError, LoadError, OutputError};
pub use loader::{clean, read_rows, CleanReport};
pub use reports::{analyze, Analysis};
