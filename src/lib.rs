use std::sync::Arc;

use cache::CommonCache;
use config::Config;
use counter::RequestCounter;
use database::{CountryRepository, PersonRepository};
use services::{CountryService, PersonService};

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod counter;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod result;
pub mod router;
pub mod routes;
pub mod services;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cache: Arc<CommonCache>,
    pub counter: Arc<RequestCounter>,
    pub countries: CountryService,
    pub persons: PersonService,
}

impl AppState {
    /// Wires both services onto one shared cache and request counter.
    pub fn new(
        config: Config,
        country_repository: Arc<dyn CountryRepository>,
        person_repository: Arc<dyn PersonRepository>,
    ) -> Self {
        let cache = Arc::new(CommonCache::new());
        let counter = Arc::new(RequestCounter::new());
        let persons = PersonService::new(person_repository, cache.clone(), counter.clone());
        let countries = CountryService::new(
            country_repository,
            persons.clone(),
            cache.clone(),
            counter.clone(),
        );

        Self {
            config,
            cache,
            counter,
            countries,
            persons,
        }
    }
}
