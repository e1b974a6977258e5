//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling via deadpool-postgres, plus the
//! production implementations of the movie and list cache traits and the
//! API-key store. Startup creates the schema when it is missing.

use crate::auth::ApiKey;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use reelscore_core::{
    CachedList, CachedMovie, ListMovie, ListResult, MovieData, RtSlug, StoreError, TitleId,
};
use reelscore_storage::{hash_url, ListCache, MovieCache};
use std::collections::HashMap;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "reelscore".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("REELSCORE_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("REELSCORE_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("REELSCORE_DB_NAME")
                .unwrap_or_else(|_| "reelscore".to_string()),
            user: std::env::var("REELSCORE_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("REELSCORE_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("REELSCORE_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            timeout: Duration::from_secs(
                std::env::var("REELSCORE_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig { recycling_method: RecyclingMethod::Fast });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS rt_cache (
    imdb_id VARCHAR(15) PRIMARY KEY,
    rt_slug VARCHAR(255) NOT NULL,
    title VARCHAR(255),
    year INTEGER,
    critic_score INTEGER,
    audience_score INTEGER,
    critic_rating VARCHAR(20),
    audience_rating VARCHAR(20),
    consensus TEXT,
    rt_url VARCHAR(255),
    cached_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_rt_cache_updated ON rt_cache(updated_at);

CREATE TABLE IF NOT EXISTS list_cache (
    url_hash VARCHAR(64) PRIMARY KEY,
    source_url TEXT NOT NULL,
    title TEXT,
    movies JSONB NOT NULL,
    cached_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS api_keys (
    id BIGSERIAL PRIMARY KEY,
    key VARCHAR(64) UNIQUE NOT NULL,
    name VARCHAR(100) NOT NULL,
    is_admin BOOLEAN NOT NULL DEFAULT FALSE,
    rate_limit INTEGER,
    requests_count INTEGER NOT NULL DEFAULT 0,
    requests_reset_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_api_keys_key ON api_keys(key);
"#;

// ============================================================================
// DATABASE CLIENT
// ============================================================================

const MOVIE_COLUMNS: &str = "imdb_id, rt_slug, title, year, critic_score, audience_score, \
                             critic_rating, audience_rating, consensus, rt_url, cached_at";

/// Database client wrapping a connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Build a client from configuration. The pool is lazy; no connection
    /// is opened until first use.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        Ok(Self { pool: config.create_pool()? })
    }

    /// Create tables and indexes when missing.
    pub async fn init_schema(&self) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.batch_execute(SCHEMA).await?;
        tracing::info!("Database schema initialized");
        Ok(())
    }

    /// Cheap connectivity probe for readiness checks.
    pub async fn health_check(&self) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // API KEY OPERATIONS
    // ========================================================================

    /// Find an active key by its value.
    pub async fn api_key_find(&self, key: &str) -> ApiResult<Option<ApiKey>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "SELECT id, key, name, is_admin, rate_limit, requests_count, \
                        requests_reset_at, is_active, created_at \
                 FROM api_keys WHERE key = $1 AND is_active = TRUE",
                &[&key],
            )
            .await?;

        row.map(|r| row_to_api_key(&r)).transpose().map_err(ApiError::from)
    }

    /// Start a fresh rate-limit window with this request counted.
    pub async fn api_key_start_window(
        &self,
        id: i64,
        reset_at: DateTime<Utc>,
    ) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.execute(
            "UPDATE api_keys SET requests_count = 1, requests_reset_at = $1 WHERE id = $2",
            &[&reset_at, &id],
        )
        .await?;
        Ok(())
    }

    /// Count one request against a key's current window.
    pub async fn api_key_increment(&self, id: i64) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.execute(
            "UPDATE api_keys SET requests_count = requests_count + 1 WHERE id = $1",
            &[&id],
        )
        .await?;
        Ok(())
    }

    /// Insert a new key and return the stored row.
    pub async fn api_key_insert(
        &self,
        key: &str,
        name: &str,
        is_admin: bool,
        rate_limit: Option<i32>,
    ) -> ApiResult<ApiKey> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_one(
                "INSERT INTO api_keys (key, name, is_admin, rate_limit) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, key, name, is_admin, rate_limit, requests_count, \
                           requests_reset_at, is_active, created_at",
                &[&key, &name, &is_admin, &rate_limit],
            )
            .await?;

        row_to_api_key(&row).map_err(ApiError::from)
    }

    /// List every key, newest first.
    pub async fn api_key_list(&self) -> ApiResult<Vec<ApiKey>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "SELECT id, key, name, is_admin, rate_limit, requests_count, \
                        requests_reset_at, is_active, created_at \
                 FROM api_keys ORDER BY created_at DESC",
                &[],
            )
            .await?;

        rows.iter().map(row_to_api_key).collect::<Result<_, _>>().map_err(ApiError::from)
    }

    /// Deactivate a key. Returns false when the id is unknown.
    pub async fn api_key_revoke(&self, id: i64) -> ApiResult<bool> {
        let conn = self.pool.get().await?;
        let updated = conn
            .execute("UPDATE api_keys SET is_active = FALSE WHERE id = $1", &[&id])
            .await?;
        Ok(updated == 1)
    }

    /// Permanently delete a key. Returns false when the id is unknown.
    pub async fn api_key_delete(&self, id: i64) -> ApiResult<bool> {
        let conn = self.pool.get().await?;
        let deleted = conn.execute("DELETE FROM api_keys WHERE id = $1", &[&id]).await?;
        Ok(deleted == 1)
    }
}

// ============================================================================
// MOVIE CACHE IMPLEMENTATION
// ============================================================================

#[async_trait]
impl MovieCache for DbClient {
    async fn get(&self, id: &TitleId) -> Result<Option<CachedMovie>, StoreError> {
        let conn = self.pool.get().await.map_err(pool_err)?;
        let statement = format!("SELECT {} FROM rt_cache WHERE imdb_id = $1", MOVIE_COLUMNS);
        let row = conn
            .query_opt(statement.as_str(), &[&id.as_str()])
            .await
            .map_err(query_err)?;

        row.map(|r| row_to_cached_movie(&r)).transpose()
    }

    async fn get_batch(
        &self,
        ids: &[TitleId],
    ) -> Result<HashMap<TitleId, CachedMovie>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let id_texts: Vec<&str> = ids.iter().map(TitleId::as_str).collect();
        let conn = self.pool.get().await.map_err(pool_err)?;
        // One round trip for the whole batch, never N.
        let statement = format!("SELECT {} FROM rt_cache WHERE imdb_id = ANY($1)", MOVIE_COLUMNS);
        let rows = conn
            .query(statement.as_str(), &[&id_texts])
            .await
            .map_err(query_err)?;

        let mut entries = HashMap::with_capacity(rows.len());
        for row in &rows {
            let movie = row_to_cached_movie(row)?;
            entries.insert(movie.imdb_id.clone(), movie);
        }
        Ok(entries)
    }

    async fn upsert(&self, id: &TitleId, data: &MovieData) -> Result<CachedMovie, StoreError> {
        let entry = CachedMovie::from_data(id.clone(), data.clone(), Utc::now());
        let conn = self.pool.get().await.map_err(pool_err)?;
        conn.execute(
            "INSERT INTO rt_cache ( \
                 imdb_id, rt_slug, title, year, critic_score, audience_score, \
                 critic_rating, audience_rating, consensus, rt_url, cached_at, updated_at \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) \
             ON CONFLICT (imdb_id) DO UPDATE SET \
                 rt_slug = $2, title = $3, year = $4, critic_score = $5, \
                 audience_score = $6, critic_rating = $7, audience_rating = $8, \
                 consensus = $9, rt_url = $10, cached_at = $11, updated_at = $11",
            &[
                &entry.imdb_id.as_str(),
                &entry.rt_slug.as_str(),
                &entry.title,
                &entry.year,
                &entry.critic_score,
                &entry.audience_score,
                &entry.critic_rating,
                &entry.audience_rating,
                &entry.consensus,
                &entry.rt_url,
                &entry.cached_at,
            ],
        )
        .await
        .map_err(query_err)?;

        Ok(entry)
    }
}

// ============================================================================
// LIST CACHE IMPLEMENTATION
// ============================================================================

#[async_trait]
impl ListCache for DbClient {
    async fn get(&self, url: &str) -> Result<Option<CachedList>, StoreError> {
        let conn = self.pool.get().await.map_err(pool_err)?;
        let row = conn
            .query_opt(
                "SELECT url_hash, source_url, title, movies, cached_at \
                 FROM list_cache WHERE url_hash = $1",
                &[&hash_url(url)],
            )
            .await
            .map_err(query_err)?;

        row.map(|r| row_to_cached_list(&r)).transpose()
    }

    async fn upsert(&self, result: &ListResult) -> Result<CachedList, StoreError> {
        let url_hash = hash_url(&result.source_url);
        let now = Utc::now();
        let movies_json =
            serde_json::to_value(&result.movies).map_err(|e| StoreError::QueryFailed {
                reason: format!("failed to encode list movies: {}", e),
            })?;

        let conn = self.pool.get().await.map_err(pool_err)?;
        conn.execute(
            "INSERT INTO list_cache (url_hash, source_url, title, movies, cached_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (url_hash) DO UPDATE SET \
                 source_url = $2, title = $3, movies = $4, cached_at = $5",
            &[&url_hash, &result.source_url, &result.title, &movies_json, &now],
        )
        .await
        .map_err(query_err)?;

        Ok(CachedList {
            url_hash,
            source_url: result.source_url.clone(),
            title: result.title.clone(),
            movies: result.movies.clone(),
            cached_at: now,
        })
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn row_to_api_key(row: &Row) -> Result<ApiKey, tokio_postgres::Error> {
    Ok(ApiKey {
        id: row.try_get("id")?,
        key: row.try_get("key")?,
        name: row.try_get("name")?,
        is_admin: row.try_get("is_admin")?,
        rate_limit: row.try_get("rate_limit")?,
        requests_count: row.try_get("requests_count")?,
        requests_reset_at: row.try_get("requests_reset_at")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_cached_movie(row: &Row) -> Result<CachedMovie, StoreError> {
    let raw_id: String = row.try_get("imdb_id").map_err(query_err)?;
    let imdb_id = TitleId::parse(&raw_id).map_err(|e| StoreError::CorruptEntry {
        key: raw_id.clone(),
        reason: e.to_string(),
    })?;

    Ok(CachedMovie {
        imdb_id,
        rt_slug: RtSlug(row.try_get("rt_slug").map_err(query_err)?),
        title: row
            .try_get::<_, Option<String>>("title")
            .map_err(query_err)?
            .unwrap_or_default(),
        year: row.try_get("year").map_err(query_err)?,
        critic_score: row.try_get("critic_score").map_err(query_err)?,
        audience_score: row.try_get("audience_score").map_err(query_err)?,
        critic_rating: row.try_get("critic_rating").map_err(query_err)?,
        audience_rating: row.try_get("audience_rating").map_err(query_err)?,
        consensus: row.try_get("consensus").map_err(query_err)?,
        rt_url: row
            .try_get::<_, Option<String>>("rt_url")
            .map_err(query_err)?
            .unwrap_or_default(),
        cached_at: row.try_get("cached_at").map_err(query_err)?,
    })
}

fn row_to_cached_list(row: &Row) -> Result<CachedList, StoreError> {
    let url_hash: String = row.try_get("url_hash").map_err(query_err)?;
    let movies_json: serde_json::Value = row.try_get("movies").map_err(query_err)?;
    let movies: Vec<ListMovie> =
        serde_json::from_value(movies_json).map_err(|e| StoreError::CorruptEntry {
            key: url_hash.clone(),
            reason: format!("failed to decode list movies: {}", e),
        })?;

    Ok(CachedList {
        url_hash,
        source_url: row.try_get("source_url").map_err(query_err)?,
        title: row
            .try_get::<_, Option<String>>("title")
            .map_err(query_err)?
            .unwrap_or_default(),
        movies,
        cached_at: row.try_get("cached_at").map_err(query_err)?,
    })
}

fn pool_err(err: deadpool_postgres::PoolError) -> StoreError {
    StoreError::Unavailable { reason: err.to_string() }
}

fn query_err(err: tokio_postgres::Error) -> StoreError {
    StoreError::QueryFailed { reason: err.to_string() }
}
