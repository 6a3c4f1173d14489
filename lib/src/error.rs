use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum ForecastError {
    #[error("At least 2 observations are needed to fit a trend line (got {observations})")]
    InsufficientData { observations : usize },

    #[error("Forecast horizon must be at least 1 day (got {horizon})")]
    InvalidHorizon { horizon : u32 },

    #[error("Cannot project {days} days past {date}")]
    DateOutOfRange { date : NaiveDate, days : u32 },
}
