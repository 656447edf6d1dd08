//! SQLite-backed history of searches and selected repositories.
//!
//! Both collections are keyed by email and capped per email: every write
//! appends a record and then deletes all but the newest `limit` records for
//! that email, inside one transaction. "Newest" means highest row id, which
//! follows commit order even if the wall clock steps backwards.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteSynchronous,
};

use crate::models::{RepoSummary, SearchQueryRecord, SelectedRepoRecord};

type Result<T> = std::result::Result<T, sqlx::Error>;

/// The two capped collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    SearchQueries,
    SelectedRepos,
}

impl Collection {
    fn table(self) -> &'static str {
        match self {
            Self::SearchQueries => "search_queries",
            Self::SelectedRepos => "selected_repos",
        }
    }
}

/// Process-wide handle to the history database. Cheap to clone.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
    limit: usize,
}

impl HistoryStore {
    /// Open (creating if needed) the database at `database_url` and make sure
    /// the schema exists. `limit` is the per-email cap for both collections.
    pub async fn connect(database_url: &str, max_connections: u32, limit: usize) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        if !database_url.contains(":memory:") {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Self::initialize_schema(&pool).await?;

        Ok(Self {
            pool,
            limit: limit.max(1),
        })
    }

    async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS search_queries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                query TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_search_queries_email_id ON search_queries(email, id DESC)",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS selected_repos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                url TEXT NOT NULL,
                description TEXT,
                star_count INTEGER,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_selected_repos_email_id ON selected_repos(email, id DESC)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Per-email cap applied on every save.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Record a search query and trim the email's search history to the cap.
    pub async fn save_search(&self, email: &str, query: &str) -> Result<i64> {
        let mut tx = self.pool.begin().await?;
        let id = insert_search(&mut *tx, email, query).await?;
        trim(&mut *tx, Collection::SearchQueries, email, self.limit).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Record a selected repo and trim the email's selection history to the cap.
    pub async fn save_selected_repo(&self, email: &str, repo: &RepoSummary) -> Result<i64> {
        let mut tx = self.pool.begin().await?;
        let id = insert_selected_repo(&mut *tx, email, repo).await?;
        trim(&mut *tx, Collection::SelectedRepos, email, self.limit).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Append a search record without trimming.
    pub async fn append_search(&self, email: &str, query: &str) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_search(&mut *conn, email, query).await
    }

    /// Append a selected-repo record without trimming.
    pub async fn append_selected_repo(&self, email: &str, repo: &RepoSummary) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_selected_repo(&mut *conn, email, repo).await
    }

    /// Delete all but the newest `limit` records for `email`. Returns the
    /// number of records removed.
    pub async fn trim_to_limit(
        &self,
        collection: Collection,
        email: &str,
        limit: usize,
    ) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        trim(&mut *conn, collection, email, limit).await
    }

    /// Up to `limit` search records for `email`, newest first.
    pub async fn recent_searches(&self, email: &str, limit: usize) -> Result<Vec<SearchQueryRecord>> {
        let rows: Vec<(i64, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT id, email, query, created_at
            FROM search_queries
            WHERE email = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(email)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, email, query, created_at)| -> Result<SearchQueryRecord> {
                Ok(SearchQueryRecord {
                    id,
                    email,
                    query,
                    timestamp: from_micros(created_at)?,
                })
            })
            .collect()
    }

    /// Up to `limit` selected-repo records for `email`, newest first.
    pub async fn recent_selected_repos(
        &self,
        email: &str,
        limit: usize,
    ) -> Result<Vec<SelectedRepoRecord>> {
        let rows: Vec<(i64, String, String, String, Option<String>, Option<i64>, i64)> =
            sqlx::query_as(
                r#"
                SELECT id, email, name, url, description, star_count, created_at
                FROM selected_repos
                WHERE email = ?
                ORDER BY id DESC
                LIMIT ?
                "#,
            )
            .bind(email)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(
                |(id, email, name, url, description, star_count, created_at)| -> Result<SelectedRepoRecord> {
                    Ok(SelectedRepoRecord {
                        id,
                        email,
                        repo: RepoSummary {
                            name,
                            url,
                            description,
                            star_count,
                        },
                        timestamp: from_micros(created_at)?,
                    })
                },
            )
            .collect()
    }

    /// Number of records stored for `email`.
    pub async fn count(&self, collection: Collection, email: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE email = ?", collection.table());
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }
}

async fn insert_search(conn: &mut SqliteConnection, email: &str, query: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO search_queries (email, query, created_at) VALUES (?, ?, ?)")
        .bind(email)
        .bind(query)
        .bind(Utc::now().timestamp_micros())
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn insert_selected_repo(
    conn: &mut SqliteConnection,
    email: &str,
    repo: &RepoSummary,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO selected_repos (email, name, url, description, star_count, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(email)
    .bind(&repo.name)
    .bind(&repo.url)
    .bind(repo.description.as_deref())
    .bind(repo.star_count)
    .bind(Utc::now().timestamp_micros())
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Keep the newest `limit` rows for `email` in one statement.
async fn trim(
    conn: &mut SqliteConnection,
    collection: Collection,
    email: &str,
    limit: usize,
) -> Result<u64> {
    let table = collection.table();
    let sql = format!(
        "DELETE FROM {table} WHERE email = ? AND id NOT IN \
         (SELECT id FROM {table} WHERE email = ? ORDER BY id DESC LIMIT ?)"
    );
    let removed = sqlx::query(&sql)
        .bind(email)
        .bind(email)
        .bind(limit as i64)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if removed > 0 {
        tracing::debug!("Trimmed {removed} old rows from {table} for {email}");
    }
    Ok(removed)
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| sqlx::Error::Decode(format!("invalid timestamp: {micros}").into()))
}
