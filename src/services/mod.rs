mod country;
mod person;

pub use country::CountryService;
pub use person::PersonService;
