use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use bigdecimal::BigDecimal;
use serde::Serialize;
use thiserror::Error;

pub const MINIMUM_GROUP_TABLES: usize = 2;
pub const MAX_NAME_LENGTH: usize = 255;

/// Failure taxonomy of the service layer. Every variant aborts the
/// surrounding database transaction; none of them is retriable.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database failure: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool failure: {0}")]
    Pool(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

/// Non-blank display name, shared by products and menu groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    pub fn new(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("name must not be blank".to_owned()));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "name must not exceed {MAX_NAME_LENGTH} characters"
            )));
        }
        Ok(Name(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Non-negative decimal price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price(BigDecimal);

impl Price {
    pub fn new(raw: BigDecimal) -> Result<Self, AppError> {
        if raw < BigDecimal::from(0) {
            return Err(AppError::Validation(
                "price must not be negative".to_owned(),
            ));
        }
        Ok(Price(raw))
    }

    pub fn into_inner(self) -> BigDecimal {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn name_rejects_blank_input() {
        assert!(matches!(Name::new(""), Err(AppError::Validation(_))));
        assert!(matches!(Name::new("   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn name_rejects_overlong_input() {
        let raw = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(Name::new(&raw), Err(AppError::Validation(_))));
    }

    #[test]
    fn name_trims_surrounding_whitespace() {
        let name = Name::new("  Kimchi  ").unwrap();
        assert_eq!(name.as_str(), "Kimchi");
    }

    #[test]
    fn price_rejects_negative_amount() {
        let raw = BigDecimal::from_str("-0.01").unwrap();
        assert!(matches!(Price::new(raw), Err(AppError::Validation(_))));
    }

    #[test]
    fn price_accepts_zero_and_positive_amounts() {
        assert!(Price::new(BigDecimal::from(0)).is_ok());
        assert!(Price::new(BigDecimal::from_str("8.50").unwrap()).is_ok());
    }

    #[test]
    fn validation_maps_to_bad_request() {
        use actix_web::ResponseError;

        let err = AppError::Validation("bad".to_owned());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("gone".to_owned()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("busy".to_owned()).status_code(),
            StatusCode::CONFLICT
        );
    }
}
