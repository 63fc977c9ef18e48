use serde::Deserialize;

pub mod counter;
pub mod country;
pub mod person;

/// Body of the batch delete endpoints
#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<i32>,
}
