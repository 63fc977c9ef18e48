use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ServiceError;

/// Longest accepted country code ("+1684" style dialing codes included)
pub const MAX_CODE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Country {
    pub id: i32,
    pub name: String,
    pub code: String,
    /// Person the country was registered by, if any
    pub person_id: Option<i32>,
}

/// Request body for create and update. Both fields are required, but they are
/// optional here so that a missing value is reported as a validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryDetails {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryUpdate {
    pub id: i32,
    #[serde(flatten)]
    pub details: CountryDetails,
}

/// A validated country that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCountry {
    pub name: String,
    pub code: String,
    pub person_id: Option<i32>,
}

impl CountryDetails {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            code: Some(code.into()),
        }
    }

    /// Returns the trimmed `(name, code)` pair.
    pub fn validate(&self) -> Result<(String, String), ServiceError> {
        let name = required(self.name.as_deref(), "name")?;
        let code = required(self.code.as_deref(), "code")?;
        if code.chars().count() > MAX_CODE_LEN {
            return Err(ServiceError::Validation(format!(
                "Country code must be at most {} characters",
                MAX_CODE_LEN
            )));
        }
        Ok((name, code))
    }
}

pub(crate) fn required(value: Option<&str>, field: &str) -> Result<String, ServiceError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ServiceError::Validation(format!("Field '{}' is required", field))),
    }
}
