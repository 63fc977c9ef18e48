//! Cache key builders. Every key the services read or write goes through here.

mod country_keys;
mod person_keys;

pub use country_keys::{ALL_COUNTRIES_KEY, COUNTRIES_CACHE, country_code_key, country_name_key};
pub use person_keys::{
    ALL_PERSONS_KEY, PERSONS_BY_COUNTRY_PREFIX, PERSONS_CACHE, persons_by_country_key,
};
