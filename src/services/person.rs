use std::sync::Arc;

use crate::cache::CommonCache;
use crate::cache::keys::{
    ALL_COUNTRIES_KEY, ALL_PERSONS_KEY, COUNTRIES_CACHE, PERSONS_BY_COUNTRY_PREFIX, PERSONS_CACHE,
    persons_by_country_key,
};
use crate::counter::RequestCounter;
use crate::database::PersonRepository;
use crate::error::ServiceError;
use crate::models::{NewPerson, Person, PersonDetails, PersonUpdate};

/// Read-through / write-invalidate access to persons.
///
/// Cache entries owned by this service:
/// - `persons` id namespace, one entry per person;
/// - `all_persons`, the full listing;
/// - `persons_by_country_<name>`, owners of a country.
#[derive(Clone)]
pub struct PersonService {
    repository: Arc<dyn PersonRepository>,
    cache: Arc<CommonCache>,
    counter: Arc<RequestCounter>,
}

impl PersonService {
    pub fn new(
        repository: Arc<dyn PersonRepository>,
        cache: Arc<CommonCache>,
        counter: Arc<RequestCounter>,
    ) -> Self {
        Self {
            repository,
            cache,
            counter,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Person>, ServiceError> {
        self.counter.increment("PersonService.findAll");
        if let Some(cached) = self.cache.get::<Vec<Person>>(ALL_PERSONS_KEY) {
            tracing::debug!("Get persons from cache: {}", ALL_PERSONS_KEY);
            return Ok(cached);
        }

        let persons = self.repository.find_all().await?;
        self.cache_persons(&persons);
        self.cache.put(ALL_PERSONS_KEY, persons.clone());
        Ok(persons)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Person>, ServiceError> {
        self.counter.increment("PersonService.findById");
        if let Some(cached) = self.cache.get_by_id::<Person>(PERSONS_CACHE, id) {
            tracing::debug!("Get person from cache: {}", id);
            return Ok(Some(cached));
        }

        let person = self.repository.find_by_id(id).await?;
        if let Some(ref p) = person {
            self.cache_person(p);
        }
        Ok(person)
    }

    pub async fn find_by_country_name(&self, country_name: &str) -> Result<Vec<Person>, ServiceError> {
        self.counter.increment("PersonService.findByCountryName");
        let cache_key = persons_by_country_key(country_name);
        if let Some(cached) = self.cache.get::<Vec<Person>>(&cache_key) {
            tracing::debug!("Get persons by country from cache: {}", cache_key);
            return Ok(cached);
        }

        let persons = self
            .repository
            .find_persons_by_country_name(country_name)
            .await?;
        self.cache.put(cache_key, persons.clone());
        self.cache_persons(&persons);
        Ok(persons)
    }

    pub async fn create(&self, details: PersonDetails) -> Result<Person, ServiceError> {
        self.counter.increment("PersonService.create");
        let new_person = details.validate()?;

        let saved = self.repository.insert(new_person).await?;
        self.cache_person(&saved);
        self.invalidate_derived();
        Ok(saved)
    }

    pub async fn create_all(&self, batch: Vec<PersonDetails>) -> Result<Vec<Person>, ServiceError> {
        self.counter.increment("PersonService.createAll");
        let new_persons = batch
            .iter()
            .map(PersonDetails::validate)
            .collect::<Result<Vec<NewPerson>, _>>()?;

        let mut saved = Vec::with_capacity(new_persons.len());
        let mut failure = None;
        for new_person in new_persons {
            match self.repository.insert(new_person).await {
                Ok(person) => {
                    self.cache_person(&person);
                    saved.push(person);
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

    /// Returns `None` when the person does not exist; the cache is left alone.
    pub async fn update(
        &self,
        id: i32,
        details: PersonDetails,
    ) -> Result<Option<Person>, ServiceError> {
        self.counter.increment("PersonService.update");
        let changes = details.validate()?;

        let Some(existing) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        let updated = self.apply_update(existing, changes).await;
        self.invalidate_derived();
        updated.map(Some)
    }

    /// Ids that do not exist are skipped.
    pub async fn update_all(&self, updates: Vec<PersonUpdate>) -> Result<Vec<Person>, ServiceError> {
        self.counter.increment("PersonService.updateAll");
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
                Ok(person) => updated.push(person),
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
        self.counter.increment("PersonService.delete");
        if let Some(person) = self.repository.find_by_id(id).await? {
            self.clear_person_cache(&person);
            self.invalidate_derived();
            self.invalidate_owned_countries();
            self.repository.delete_by_id(id).await?;
        }
        Ok(())
    }

    pub async fn delete_all(&self, ids: &[i32]) -> Result<(), ServiceError> {
        self.counter.increment("PersonService.deleteAll");
        let persons = self.repository.find_all_by_id(ids).await?;
        for person in &persons {
            self.clear_person_cache(person);
        }
        self.invalidate_derived();
        if !persons.is_empty() {
            self.invalidate_owned_countries();
        }
        self.repository.delete_all_by_id(ids).await?;
        Ok(())
    }

    // Purge before the write, repopulate only once the write went through.
    async fn apply_update(&self, mut existing: Person, changes: NewPerson) -> Result<Person, ServiceError> {
        self.clear_person_cache(&existing);
        existing.name = changes.name;
        existing.surname = changes.surname;

        let updated = self.repository.save(&existing).await?;
        self.cache_person(&updated);
        Ok(updated)
    }

    fn cache_person(&self, person: &Person) {
        self.cache.put_with_id(PERSONS_CACHE, person.id, person.clone());
    }

    fn cache_persons(&self, persons: &[Person]) {
        for person in persons {
            self.cache_person(person);
        }
    }

    fn clear_person_cache(&self, person: &Person) {
        self.cache.remove_by_id(PERSONS_CACHE, person.id);
    }

    fn invalidate_derived(&self) {
        self.cache.invalidate(ALL_PERSONS_KEY);
        self.cache.invalidate_prefix(PERSONS_BY_COUNTRY_PREFIX);
    }

    // Deleting a person detaches the countries it owned, so every cached
    // country may now carry a stale owner.
    fn invalidate_owned_countries(&self) {
        self.cache.clear_namespace(COUNTRIES_CACHE);
        self.cache.invalidate(ALL_COUNTRIES_KEY);
    }
}
