use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{CountryRepository, RepositoryResult};
use crate::models::{Country, NewCountry};

/// Postgres-backed country repository
#[derive(Clone)]
pub struct PgCountryRepository {
    pool: PgPool,
}

impl PgCountryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CountryRepository for PgCountryRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Country>> {
        let country = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, person_id FROM countries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(country)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Country>> {
        let countries = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, person_id FROM countries ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }

    async fn find_all_by_id(&self, ids: &[i32]) -> RepositoryResult<Vec<Country>> {
        let countries = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, person_id FROM countries WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Country>> {
        let country = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, person_id FROM countries WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(country)
    }

    async fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Country>> {
        let country = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, person_id FROM countries WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(country)
    }

    async fn insert(&self, country: NewCountry) -> RepositoryResult<Country> {
        let result = sqlx::query_as::<_, Country>(
            r#"
            INSERT INTO countries (name, code, person_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, code, person_id
            "#,
        )
        .bind(&country.name)
        .bind(&country.code)
        .bind(country.person_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(saved) => {
                tracing::info!("Inserted country {} ({})", saved.id, saved.code);
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!("Failed to insert country {}: {:?}", country.name, e);
                Err(e.into())
            }
        }
    }

    async fn save(&self, country: &Country) -> RepositoryResult<Country> {
        let saved = sqlx::query_as::<_, Country>(
            r#"
            UPDATE countries
            SET name = $1, code = $2, person_id = $3
            WHERE id = $4
            RETURNING id, name, code, person_id
            "#,
        )
        .bind(&country.name)
        .bind(&country.code)
        .bind(country.person_id)
        .bind(country.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn delete_by_id(&self, id: i32) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM countries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[i32]) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM countries WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted {} countries", result.rows_affected());
        Ok(())
    }
}
