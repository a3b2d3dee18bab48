use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const ORG_NAME_MIN_LEN: usize = 3;
pub const ORG_NAME_MAX_LEN: usize = 50;

/// Organization names are 3 to 50 ASCII letters, digits or underscores.
pub fn validate_org_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if !(ORG_NAME_MIN_LEN..=ORG_NAME_MAX_LEN).contains(&len) {
        let mut err = ValidationError::new("org_name_length");
        err.message = Some(Cow::Borrowed(
            "Organization name must be between 3 and 50 characters",
        ));
        return Err(err);
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        let mut err = ValidationError::new("org_name_charset");
        err.message = Some(Cow::Borrowed(
            "Organization name must contain only alphanumeric characters and underscores",
        ));
        return Err(err);
    }

    Ok(())
}

pub fn normalize_org_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed JSON is rejected with 400, rule violations with 422.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e)))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
