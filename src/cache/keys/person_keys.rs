/// Id namespace holding persons
pub const PERSONS_CACHE: &str = "persons";

/// Cached result of "list all persons"
pub const ALL_PERSONS_KEY: &str = "all_persons";

/// Prefix of the persons-by-country lookups, invalidated as a family
pub const PERSONS_BY_COUNTRY_PREFIX: &str = "persons_by_country_";

pub fn persons_by_country_key(country_name: &str) -> String {
    format!("{}{}", PERSONS_BY_COUNTRY_PREFIX, country_name)
}
