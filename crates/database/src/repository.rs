use crate::DbError;
use async_trait::async_trait;
use core_types::{County, Indicator, Observation};
use sqlx::postgres::PgPool;

/// The read operations the HTTP layer needs from the statistics store.
///
/// Every method is a single read and releases its connection before
/// returning. Nothing here writes.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// All counties, ordered by id ascending.
    async fn list_counties(&self) -> Result<Vec<County>, DbError>;

    /// One county by id. `DbError::NotFound` when no row matches.
    async fn get_county(&self, id: i32) -> Result<County, DbError>;

    /// All indicators, ordered by id ascending.
    async fn list_indicators(&self) -> Result<Vec<Indicator>, DbError>;

    /// Observations whose indicator code and year both match exactly.
    /// An empty vector is a valid answer, not an error.
    async fn get_observations(
        &self,
        indicator_code: &str,
        year: i32,
    ) -> Result<Vec<Observation>, DbError>;
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for DbRepository {
    async fn list_counties(&self) -> Result<Vec<County>, DbError> {
        let counties = sqlx::query_as::<_, County>(
            "SELECT id, name, code, former_province, area_sq_km FROM counties ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counties)
    }

    async fn get_county(&self, id: i32) -> Result<County, DbError> {
        let county = sqlx::query_as::<_, County>(
            "SELECT id, name, code, former_province, area_sq_km FROM counties WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| if let sqlx::Error::RowNotFound = e { DbError::NotFound } else { e.into() })?;

        Ok(county)
    }

    async fn list_indicators(&self) -> Result<Vec<Indicator>, DbError> {
        let indicators = sqlx::query_as::<_, Indicator>(
            "SELECT id, code, name, unit FROM indicators ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(indicators)
    }

    /// Plain `=` on both columns: no LIKE, no case folding.
    /// National rows (no county) sort first, then counties by id.
    async fn get_observations(
        &self,
        indicator_code: &str,
        year: i32,
    ) -> Result<Vec<Observation>, DbError> {
        let observations = sqlx::query_as::<_, Observation>(
            r#"
            SELECT
                i.code AS indicator_code,
                o.county_id,
                c.name AS county_name,
                o.year,
                o.value
            FROM
                observations AS o
            JOIN
                indicators AS i ON i.id = o.indicator_id
            LEFT JOIN
                counties AS c ON c.id = o.county_id
            WHERE
                i.code = $1 AND o.year = $2
            ORDER BY
                o.county_id ASC NULLS FIRST
            "#,
        )
        .bind(indicator_code)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(observations)
    }
}
