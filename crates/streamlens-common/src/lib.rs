//! Common types, errors, and logging for the streamlens workspace

pub mod error;
pub mod logging;
pub mod test_utils;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{Result, StreamlensError};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use types::{
    AgeBracket, AggregatedMetric, DemographicSlice, Gender, Period, PeriodWindow, Platform,
    StreamRecord,
};
