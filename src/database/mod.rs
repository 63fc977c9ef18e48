// Backing store
// Repository traits consumed by the services, with the Postgres implementations

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::RepositoryError;
use crate::models::{Country, NewCountry, NewPerson, Person};

#[cfg(test)]
pub mod memory;
pub mod repositories;

pub use repositories::{PgCountryRepository, PgPersonRepository};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait CountryRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Country>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Country>>;

    /// Ids that do not exist are skipped.
    async fn find_all_by_id(&self, ids: &[i32]) -> RepositoryResult<Vec<Country>>;

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Country>>;

    async fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Country>>;

    /// Persists a new row and returns it with its generated id.
    async fn insert(&self, country: NewCountry) -> RepositoryResult<Country>;

    /// Writes every field of an existing row.
    async fn save(&self, country: &Country) -> RepositoryResult<Country>;

    async fn delete_by_id(&self, id: i32) -> RepositoryResult<()>;

    async fn delete_all_by_id(&self, ids: &[i32]) -> RepositoryResult<()>;
}

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Person>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Person>>;

    async fn find_all_by_id(&self, ids: &[i32]) -> RepositoryResult<Vec<Person>>;

    /// Persons owning the country with the given name.
    async fn find_persons_by_country_name(&self, country_name: &str)
    -> RepositoryResult<Vec<Person>>;

    async fn insert(&self, person: NewPerson) -> RepositoryResult<Person>;

    async fn save(&self, person: &Person) -> RepositoryResult<Person>;

    /// Countries owned by the person are detached, not deleted.
    async fn delete_by_id(&self, id: i32) -> RepositoryResult<()>;

    async fn delete_all_by_id(&self, ids: &[i32]) -> RepositoryResult<()>;
}

/// Applies the schema migrations shipped under `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
