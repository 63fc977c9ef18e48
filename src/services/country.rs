use std::sync::Arc;

use super::PersonService;
use crate::bootstrap::CountryCodeLoader;
use crate::cache::CommonCache;
use crate::cache::keys::{
    ALL_COUNTRIES_KEY, COUNTRIES_CACHE, PERSONS_BY_COUNTRY_PREFIX, country_code_key,
    country_name_key,
};
use crate::counter::RequestCounter;
use crate::database::CountryRepository;
use crate::error::ServiceError;
use crate::models::{Country, CountryDetails, CountryUpdate, NewCountry};

/// Read-through / write-invalidate access to countries.
///
/// Besides the `countries` id namespace and the `all_countries` listing, every
/// cached country also installs its `country_code_<name>` and
/// `country_name_<code>` lookups. Country ownership feeds the person service's
/// `persons_by_country_*` lookups, which are therefore invalidated on every
/// country write as well.
#[derive(Clone)]
pub struct CountryService {
    repository: Arc<dyn CountryRepository>,
    persons: PersonService,
    cache: Arc<CommonCache>,
    counter: Arc<RequestCounter>,
}

impl CountryService {
    pub fn new(
        repository: Arc<dyn CountryRepository>,
        persons: PersonService,
        cache: Arc<CommonCache>,
        counter: Arc<RequestCounter>,
    ) -> Self {
        Self {
            repository,
            persons,
            cache,
            counter,
        }
    }

    /// Seeds the name/code lookups from the external table. Failures are
    /// logged and swallowed; returns the number of rows seeded.
    pub async fn load_country_codes(&self, loader: &CountryCodeLoader) -> usize {
        self.counter.increment("CountryService.loadCountryCodes");
        match loader.fetch().await {
            Ok(rows) => {
                for row in &rows {
                    self.cache.put(country_code_key(&row.name), row.code.clone());
                    self.cache.put(country_name_key(&row.code), row.name.clone());
                }
                tracing::info!("Seeded {} country codes from {}", rows.len(), loader.url());
                rows.len()
            }
            Err(e) => {
                tracing::warn!("Country code bootstrap skipped: {}", e);
                0
            }
        }
    }

    pub async fn get_code_by_country(&self, name: &str) -> Result<Option<String>, ServiceError> {
        self.counter.increment("CountryService.getCodeByCountry");
        let cache_key = country_code_key(name);
        if let Some(code) = self.cache.get::<String>(&cache_key) {
            tracing::debug!("Get country code from cache: {}", cache_key);
            return Ok(Some(code));
        }

        let country = self.repository.find_by_name(name).await?;
        Ok(country.map(|c| {
            self.cache.put(cache_key, c.code.clone());
            self.cache.put(country_name_key(&c.code), name.to_string());
            c.code
        }))
    }

    pub async fn get_country_by_code(&self, code: &str) -> Result<Option<String>, ServiceError> {
        self.counter.increment("CountryService.getCountryByCode");
        let cache_key = country_name_key(code);
        if let Some(name) = self.cache.get::<String>(&cache_key) {
            tracing::debug!("Get country name from cache: {}", cache_key);
            return Ok(Some(name));
        }

        let country = self.repository.find_by_code(code).await?;
        Ok(country.map(|c| {
            self.cache.put(cache_key, c.name.clone());
            self.cache.put(country_code_key(&c.name), code.to_string());
            c.name
        }))
    }

    pub async fn find_all(&self) -> Result<Vec<Country>, ServiceError> {
        self.counter.increment("CountryService.findAll");
        if let Some(cached) = self.cache.get::<Vec<Country>>(ALL_COUNTRIES_KEY) {
            tracing::debug!("Get countries from cache: {}", ALL_COUNTRIES_KEY);
            return Ok(cached);
        }

        let countries = self.repository.find_all().await?;
        for country in &countries {
            self.cache_country(country);
        }
        self.cache.put(ALL_COUNTRIES_KEY, countries.clone());
        Ok(countries)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Country>, ServiceError> {
        self.counter.increment("CountryService.findById");
        if let Some(cached) = self.cache.get_by_id::<Country>(COUNTRIES_CACHE, id) {
            tracing::debug!("Get country from cache: {}", id);
            return Ok(Some(cached));
        }

        let country = self.repository.find_by_id(id).await?;
        if let Some(ref c) = country {
            self.cache_country(c);
        }
        Ok(country)
    }

    /// Creates a country, optionally owned by `person_id`. Returns `None`
    /// without writing anything when that person does not exist.
    pub async fn create(
        &self,
        details: CountryDetails,
        person_id: Option<i32>,
    ) -> Result<Option<Country>, ServiceError> {
        self.counter.increment("CountryService.create");
        let (name, code) = details.validate()?;
        if !self.owner_exists(person_id).await? {
            return Ok(None);
        }

        let saved = self
            .repository
            .insert(NewCountry {
                name,
                code,
                person_id,
            })
            .await?;
        self.cache_country(&saved);
        self.invalidate_derived();
        Ok(Some(saved))
    }

    /// Returns an empty list when the owning person does not exist.
    pub async fn create_all(
        &self,
        batch: Vec<CountryDetails>,
        person_id: Option<i32>,
    ) -> Result<Vec<Country>, ServiceError> {
        self.counter.increment("CountryService.createAll");
        let validated = batch
            .iter()
            .map(CountryDetails::validate)
            .collect::<Result<Vec<_>, _>>()?;
        if !self.owner_exists(person_id).await? {
            return Ok(Vec::new());
        }

        let mut saved = Vec::with_capacity(validated.len());
        let mut failure = None;
        for (name, code) in validated {
            let new_country = NewCountry {
                name,
                code,
                person_id,
            };
            match self.repository.insert(new_country).await {
                Ok(country) => {
                    self.cache_country(&country);
                    saved.push(country);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        self.invalidate_derived();
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(saved),
        }
    }

    /// Returns `None` when the country does not exist; the cache is left alone.
    pub async fn update(
        &self,
        id: i32,
        details: CountryDetails,
    ) -> Result<Option<Country>, ServiceError> {
        self.counter.increment("CountryService.update");
        let changes = details.validate()?;

        let Some(existing) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        let updated = self.apply_update(existing, changes).await;
        self.invalidate_derived();
        updated.map(Some)
    }

    /// Ids that do not exist are skipped.
    pub async fn update_all(
        &self,
        updates: Vec<CountryUpdate>,
    ) -> Result<Vec<Country>, ServiceError> {
        self.counter.increment("CountryService.updateAll");
        let changes = updates
            .iter()
            .map(|update| update.details.validate().map(|c| (update.id, c)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut updated = Vec::with_capacity(changes.len());
        let mut failure: Option<ServiceError> = None;
        for (id, change) in changes {
            let existing = match self.repository.find_by_id(id).await {
                Ok(Some(existing)) => existing,
                Ok(None) => continue,
                Err(e) => {
                    failure = Some(e.into());
                    break;
                }
            };
            match self.apply_update(existing, change).await {
                Ok(country) => updated.push(country),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if !updated.is_empty() || failure.is_some() {
            self.invalidate_derived();
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(updated),
        }
    }

    /// Missing ids are ignored.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.counter.increment("CountryService.delete");
        if let Some(country) = self.repository.find_by_id(id).await? {
            self.clear_country_cache(&country);
            self.invalidate_derived();
            self.repository.delete_by_id(id).await?;
        }
        Ok(())
    }

    pub async fn delete_all(&self, ids: &[i32]) -> Result<(), ServiceError> {
        self.counter.increment("CountryService.deleteAll");
        let countries = self.repository.find_all_by_id(ids).await?;
        for country in &countries {
            self.clear_country_cache(country);
        }
        self.invalidate_derived();
        self.repository.delete_all_by_id(ids).await?;
        Ok(())
    }

    async fn owner_exists(&self, person_id: Option<i32>) -> Result<bool, ServiceError> {
        match person_id {
            Some(id) => Ok(self.persons.find_by_id(id).await?.is_some()),
            None => Ok(true),
        }
    }

    // Old lookups go before the write; the new ones only after it succeeded.
    async fn apply_update(
        &self,
        mut existing: Country,
        (name, code): (String, String),
    ) -> Result<Country, ServiceError> {
        self.clear_country_cache(&existing);
        existing.name = name;
        existing.code = code;

        let updated = self.repository.save(&existing).await?;
        self.cache_country(&updated);
        Ok(updated)
    }

    fn cache_country(&self, country: &Country) {
        self.cache
            .put_with_id(COUNTRIES_CACHE, country.id, country.clone());
        self.cache
            .put(country_code_key(&country.name), country.code.clone());
        self.cache
            .put(country_name_key(&country.code), country.name.clone());
    }

    fn clear_country_cache(&self, country: &Country) {
        self.cache.remove_by_id(COUNTRIES_CACHE, country.id);
        self.cache.invalidate(country_code_key(&country.name));
        self.cache.invalidate(country_name_key(&country.code));
    }

    fn invalidate_derived(&self) {
        self.cache.invalidate(ALL_COUNTRIES_KEY);
        self.cache.invalidate_prefix(PERSONS_BY_COUNTRY_PREFIX);
    }
}
