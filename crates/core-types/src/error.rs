use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid period type '{0}': expected one of day, week, month, quarter, half, year")]
    InvalidPeriodType(String),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
