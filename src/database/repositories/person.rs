use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{PersonRepository, RepositoryResult};
use crate::models::{NewPerson, Person};

/// Postgres-backed person repository
#[derive(Clone)]
pub struct PgPersonRepository {
    pool: PgPool,
}

impl PgPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Person>> {
        let person =
            sqlx::query_as::<_, Person>("SELECT id, name, surname FROM persons WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(person)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Person>> {
        let persons =
            sqlx::query_as::<_, Person>("SELECT id, name, surname FROM persons ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(persons)
    }

    async fn find_all_by_id(&self, ids: &[i32]) -> RepositoryResult<Vec<Person>> {
        let persons = sqlx::query_as::<_, Person>(
            "SELECT id, name, surname FROM persons WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(persons)
    }

    async fn find_persons_by_country_name(
        &self,
        country_name: &str,
    ) -> RepositoryResult<Vec<Person>> {
        let persons = sqlx::query_as::<_, Person>(
            r#"
            SELECT p.id, p.name, p.surname
            FROM persons p
            JOIN countries c ON c.person_id = p.id
            WHERE c.name = $1
            ORDER BY p.id
            "#,
        )
        .bind(country_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(persons)
    }

    async fn insert(&self, person: NewPerson) -> RepositoryResult<Person> {
        let saved = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO persons (name, surname)
            VALUES ($1, $2)
            RETURNING id, name, surname
            "#,
        )
        .bind(&person.name)
        .bind(&person.surname)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Inserted person {}", saved.id);
        Ok(saved)
    }

    async fn save(&self, person: &Person) -> RepositoryResult<Person> {
        let saved = sqlx::query_as::<_, Person>(
            r#"
            UPDATE persons
            SET name = $1, surname = $2
            WHERE id = $3
            RETURNING id, name, surname
            "#,
        )
        .bind(&person.name)
        .bind(&person.surname)
        .bind(person.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn delete_by_id(&self, id: i32) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[i32]) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM persons WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted {} persons", result.rows_affected());
        Ok(())
    }
}
