//! In-memory backing store used by the service and router tests.
//!
//! Both repository traits are implemented on one struct so that the
//! person/country relation (ownership, detach on delete) behaves like the
//! Postgres schema. Every repository call is counted per operation, e.g.
//! `countries.find_by_id`, so tests can assert whether the cache absorbed a
//! read.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CountryRepository, PersonRepository, RepositoryResult};
use crate::error::RepositoryError;
use crate::models::{Country, NewCountry, NewPerson, Person};

#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    countries: Mutex<BTreeMap<i32, Country>>,
    persons: Mutex<BTreeMap<i32, Person>>,
    sequence: AtomicI32,
    calls: Mutex<HashMap<String, usize>>,
    failing: AtomicBool,
    remaining_ok: Mutex<Option<usize>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the given operation was invoked.
    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    /// Makes every following call fail with a database error.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Lets the next `calls` repository calls through and fails the one after.
    pub fn fail_after(&self, calls: usize) {
        *self.remaining_ok.lock() = Some(calls);
    }

    /// Writes a row directly, bypassing the services and the call counters.
    pub fn seed_country(&self, name: &str, code: &str, person_id: Option<i32>) -> Country {
        let country = Country {
            id: self.next_id(),
            name: name.into(),
            code: code.into(),
            person_id,
        };
        self.countries.lock().insert(country.id, country.clone());
        country
    }

    pub fn seed_person(&self, name: &str, surname: &str) -> Person {
        let person = Person {
            id: self.next_id(),
            name: name.into(),
            surname: surname.into(),
        };
        self.persons.lock().insert(person.id, person.clone());
        person
    }

    /// Changes a row behind the cache's back.
    pub fn overwrite_country(&self, country: Country) {
        self.countries.lock().insert(country.id, country);
    }

    pub fn stored_country(&self, id: i32) -> Option<Country> {
        self.countries.lock().get(&id).cloned()
    }

    fn next_id(&self) -> i32 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record(&self, operation: &str) -> RepositoryResult<()> {
        *self.calls.lock().entry(operation.to_string()).or_default() += 1;
        let mut remaining = self.remaining_ok.lock();
        let scheduled = match *remaining {
            Some(0) => {
                *remaining = None;
                true
            }
            Some(ref mut n) => {
                *n -= 1;
                false
            }
            None => false,
        };
        if scheduled || self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn check_country_unique(&self, candidate: &Country) -> RepositoryResult<()> {
        let countries = self.countries.lock();
        let clash = countries.values().find(|existing| {
            existing.id != candidate.id
                && (existing.name == candidate.name || existing.code == candidate.code)
        });
        match clash {
            Some(existing) if existing.code == candidate.code => Err(RepositoryError::Conflict(
                "duplicate key value violates unique constraint \"countries_code_key\"".into(),
            )),
            Some(_) => Err(RepositoryError::Conflict(
                "duplicate key value violates unique constraint \"countries_name_key\"".into(),
            )),
            None => Ok(()),
        }
    }

    fn check_owner_exists(&self, person_id: Option<i32>) -> RepositoryResult<()> {
        match person_id {
            Some(id) if !self.persons.lock().contains_key(&id) => Err(RepositoryError::Conflict(
                "insert or update on table \"countries\" violates foreign key constraint".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CountryRepository for InMemoryDatabase {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Country>> {
        self.record("countries.find_by_id")?;
        Ok(self.countries.lock().get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Country>> {
        self.record("countries.find_all")?;
        Ok(self.countries.lock().values().cloned().collect())
    }

    async fn find_all_by_id(&self, ids: &[i32]) -> RepositoryResult<Vec<Country>> {
        self.record("countries.find_all_by_id")?;
        let countries = self.countries.lock();
        Ok(ids.iter().filter_map(|id| countries.get(id).cloned()).collect())
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Country>> {
        self.record("countries.find_by_name")?;
        Ok(self
            .countries
            .lock()
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Country>> {
        self.record("countries.find_by_code")?;
        Ok(self
            .countries
            .lock()
            .values()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn insert(&self, country: NewCountry) -> RepositoryResult<Country> {
        self.record("countries.insert")?;
        let candidate = Country {
            id: 0,
            name: country.name,
            code: country.code,
            person_id: country.person_id,
        };
        self.check_country_unique(&candidate)?;
        self.check_owner_exists(candidate.person_id)?;

        let saved = Country {
            id: self.next_id(),
            ..candidate
        };
        self.countries.lock().insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn save(&self, country: &Country) -> RepositoryResult<Country> {
        self.record("countries.save")?;
        self.check_country_unique(country)?;
        self.check_owner_exists(country.person_id)?;

        let mut countries = self.countries.lock();
        match countries.get_mut(&country.id) {
            Some(row) => {
                *row = country.clone();
                Ok(country.clone())
            }
            None => Err(RepositoryError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete_by_id(&self, id: i32) -> RepositoryResult<()> {
        self.record("countries.delete_by_id")?;
        self.countries.lock().remove(&id);
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[i32]) -> RepositoryResult<()> {
        self.record("countries.delete_all_by_id")?;
        let mut countries = self.countries.lock();
        for id in ids {
            countries.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl PersonRepository for InMemoryDatabase {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Person>> {
        self.record("persons.find_by_id")?;
        Ok(self.persons.lock().get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Person>> {
        self.record("persons.find_all")?;
        Ok(self.persons.lock().values().cloned().collect())
    }

    async fn find_all_by_id(&self, ids: &[i32]) -> RepositoryResult<Vec<Person>> {
        self.record("persons.find_all_by_id")?;
        let persons = self.persons.lock();
        Ok(ids.iter().filter_map(|id| persons.get(id).cloned()).collect())
    }

    async fn find_persons_by_country_name(
        &self,
        country_name: &str,
    ) -> RepositoryResult<Vec<Person>> {
        self.record("persons.find_persons_by_country_name")?;
        let owners: Vec<i32> = self
            .countries
            .lock()
            .values()
            .filter(|c| c.name == country_name)
            .filter_map(|c| c.person_id)
            .collect();
        let persons = self.persons.lock();
        Ok(owners
            .iter()
            .filter_map(|id| persons.get(id).cloned())
            .collect())
    }

    async fn insert(&self, person: NewPerson) -> RepositoryResult<Person> {
        self.record("persons.insert")?;
        let saved = Person {
            id: self.next_id(),
            name: person.name,
            surname: person.surname,
        };
        self.persons.lock().insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn save(&self, person: &Person) -> RepositoryResult<Person> {
        self.record("persons.save")?;
        let mut persons = self.persons.lock();
        match persons.get_mut(&person.id) {
            Some(row) => {
                *row = person.clone();
                Ok(person.clone())
            }
            None => Err(RepositoryError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete_by_id(&self, id: i32) -> RepositoryResult<()> {
        self.record("persons.delete_by_id")?;
        self.remove_person(id);
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[i32]) -> RepositoryResult<()> {
        self.record("persons.delete_all_by_id")?;
        for id in ids {
            self.remove_person(*id);
        }
        Ok(())
    }
}

impl InMemoryDatabase {
    // ON DELETE SET NULL
    fn remove_person(&self, id: i32) {
        if self.persons.lock().remove(&id).is_some() {
            for country in self.countries.lock().values_mut() {
                if country.person_id == Some(id) {
                    country.person_id = None;
                }
            }
        }
    }
}
