mod country;
mod person;

pub use country::{Country, CountryDetails, CountryUpdate, MAX_CODE_LEN, NewCountry};
pub use person::{NewPerson, Person, PersonDetails, PersonUpdate};
