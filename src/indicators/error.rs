use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{indicator}: insufficient data, need {required} bars, got {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{indicator}: invalid parameter: {reason}")]
    InvalidParameter {
        indicator: &'static str,
        reason: String,
    },

    #[error("price series is not strictly chronological at index {index}")]
    UnorderedSeries { index: usize },
}

impl IndicatorError {
    pub fn invalid(indicator: &'static str, reason: impl Into<String>) -> Self {
        IndicatorError::InvalidParameter {
            indicator,
            reason: reason.into(),
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, IndicatorError::InsufficientData { .. })
    }
}
