/// Id namespace holding countries
pub const COUNTRIES_CACHE: &str = "countries";

/// Cached result of "list all countries"
pub const ALL_COUNTRIES_KEY: &str = "all_countries";

/// Country name -> code lookup prefix
const COUNTRY_CODE_PREFIX: &str = "country_code_";

/// Country code -> name lookup prefix
const COUNTRY_NAME_PREFIX: &str = "country_name_";

pub fn country_code_key(name: &str) -> String {
    format!("{}{}", COUNTRY_CODE_PREFIX, name)
}

pub fn country_name_key(code: &str) -> String {
    format!("{}{}", COUNTRY_NAME_PREFIX, code)
}
