use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} '{1}' was not found in the journal")]
    NotFound(&'static str, String),

    #[error("Compliance record references unknown trade '{0}'")]
    UnknownTrade(String),
}
