use thiserror::Error;

#[derive(Debug, Error)]
pub enum BondCalcError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate arithmetic in {context}")]
    ArithmeticDegenerate { context: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BondCalcError {
    /// True for errors the caller can fix by supplying different inputs.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, BondCalcError::InvalidInput { .. })
    }
}

impl From<serde_json::Error> for BondCalcError {
    fn from(e: serde_json::Error) -> Self {
        BondCalcError::Serialization(e.to_string())
    }
}
