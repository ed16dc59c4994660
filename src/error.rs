use thiserror::Error;

use crate::core::round_money;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Input outside the domain of the operation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced record does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Ledger could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        AppError::NotFound { entity, id }
    }

    /// Short machine-readable code used in error responses
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound { .. } => "not_found",
            AppError::Storage(_) => "storage_error",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(feature = "api")]
mod response {
    use actix_web::error::BlockingError;
    use actix_web::{http::StatusCode, HttpResponse, ResponseError};

    use super::AppError;
    use crate::models::ErrorResponse;

    impl From<BlockingError> for AppError {
        fn from(err: BlockingError) -> Self {
            AppError::Storage(err.to_string())
        }
    }

    impl ResponseError for AppError {
        fn status_code(&self) -> StatusCode {
            match self {
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                AppError::Conflict(_) => StatusCode::CONFLICT,
                AppError::NotFound { .. } => StatusCode::NOT_FOUND,
                AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_response(&self) -> HttpResponse {
            HttpResponse::build(self.status_code()).json(ErrorResponse {
                error: self.code().to_string(),
                message: self.to_string(),
            })
        }
    }
}

/// Validation functions
///
/// Amounts are checked after rounding to cents, so anything below half a cent
/// is rejected.
pub fn validate_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || round_money(amount) <= 0.0 {
        return Err(AppError::Validation(format!(
            "{} must be at least 0.01, got {}",
            field, amount
        )));
    }
    Ok(())
}

pub fn validate_odds(odds: f64) -> Result<()> {
    if !odds.is_finite() || odds <= 1.0 {
        return Err(AppError::Validation(format!(
            "Odds must be greater than 1, got {}",
            odds
        )));
    }
    Ok(())
}

pub fn validate_probability(prob: f64) -> Result<()> {
    if !(prob > 0.0 && prob < 1.0) {
        return Err(AppError::Validation(format!(
            "Probability must be strictly between 0 and 1, got {}",
            prob
        )));
    }
    Ok(())
}

pub fn validate_reinvestment(fraction: f64) -> Result<()> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(AppError::Validation(format!(
            "Reinvestment fraction must be in (0, 1], got {}",
            fraction
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("stake", 0.01).is_ok());
        assert!(validate_amount("stake", 0.0).is_err());
        assert!(validate_amount("stake", -5.0).is_err());
        assert!(validate_amount("stake", f64::NAN).is_err());
        assert!(validate_amount("stake", f64::INFINITY).is_err());

        // Sub-cent amounts round to zero
        assert!(validate_amount("stake", 0.004).is_err());
        assert!(validate_amount("stake", 0.005).is_ok());
    }

    #[test]
    fn test_validate_odds() {
        assert!(validate_odds(1.01).is_ok());
        assert!(validate_odds(12.0).is_ok());
        assert!(validate_odds(1.0).is_err());
        assert!(validate_odds(0.5).is_err());
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability(0.5).is_ok());
        assert!(validate_probability(0.0).is_err());
        assert!(validate_probability(1.0).is_err());
        assert!(validate_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_reinvestment() {
        assert!(validate_reinvestment(1.0).is_ok());
        assert!(validate_reinvestment(0.8).is_ok());
        assert!(validate_reinvestment(0.0).is_err());
        assert!(validate_reinvestment(1.2).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Validation("test error".to_string());
        assert!(err.to_string().contains("Validation error"));

        let err = AppError::not_found("Bet", 7);
        assert_eq!(err.to_string(), "Bet 7 not found");
        assert_eq!(err.code(), "not_found");
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_error_status_codes() {
        use actix_web::{http::StatusCode, ResponseError};

        assert_eq!(
            AppError::Validation(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict(String::new()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_found("Stream", 1).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Storage(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
