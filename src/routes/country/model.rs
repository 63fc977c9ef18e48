use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PersonIdQuery {
    pub person_id: Option<i32>,
}

/// One side of the name/code lookup
#[derive(Debug, Serialize)]
pub struct CountryCodeResponse {
    pub name: String,
    pub code: String,
}
