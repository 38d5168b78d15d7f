use thiserror::Error;

#[derive(Debug, Error)]
pub enum OlaError {
    /// Sampling parameters out of range. Nothing is produced.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A slice lacks a required column or carries a value of the wrong type.
    /// The estimator's running state is left exactly as it was before the slice.
    #[error("schema mismatch on column '{column}': {reason}")]
    SchemaMismatch { column: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OlaError {
    pub(crate) fn schema<C: Into<String>, R: Into<String>>(column: C, reason: R) -> Self {
        OlaError::SchemaMismatch {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, OlaError::SchemaMismatch { .. })
    }
}
