mod country;
mod person;

pub use country::PgCountryRepository;
pub use person::PgPersonRepository;
