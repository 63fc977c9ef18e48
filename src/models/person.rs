use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::country::required;
use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonDetails {
    pub name: Option<String>,
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonUpdate {
    pub id: i32,
    #[serde(flatten)]
    pub details: PersonDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub surname: String,
}

impl PersonDetails {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            surname: Some(surname.into()),
        }
    }

    pub fn validate(&self) -> Result<NewPerson, ServiceError> {
        Ok(NewPerson {
            name: required(self.name.as_deref(), "name")?,
            surname: required(self.surname.as_deref(), "surname")?,
        })
    }
}
