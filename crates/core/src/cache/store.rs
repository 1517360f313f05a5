//! Entry CRUD operations and generation lifecycle.
//!
//! `GenerationCache` is the per-generation handle the rest of the system
//! works through: get and put are scoped to one generation's namespace.
//! Generation enumeration and deletion live on `CacheDb` since they span
//! namespaces.

use super::connection::CacheDb;
use crate::Error;
use crate::snapshot::ResponseSnapshot;
use crate::version::Generation;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A namespaced view over one generation's entries.
///
/// Concurrent puts to the same identity are last-write-wins; entries are
/// idempotent re-derivations of network state, not a source of truth.
#[derive(Clone, Debug)]
pub struct GenerationCache {
    db: CacheDb,
    generation: Generation,
}

impl GenerationCache {
    pub(crate) fn new(db: CacheDb, generation: Generation) -> Self {
        Self { db, generation }
    }

    /// The generation this handle is scoped to.
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Look up a stored snapshot by request identity.
    ///
    /// Returns None if no entry exists in this generation's namespace.
    pub async fn get(&self, identity: &str) -> Result<Option<ResponseSnapshot>, Error> {
        let generation = self.generation.as_str().to_string();
        let identity = identity.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<Option<ResponseSnapshot>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT url, status, content_type, headers_json, body, stored_at
                     FROM entries WHERE generation = ?1 AND identity = ?2",
                )?;

                let result = stmt.query_row(params![generation, identity], |row| {
                    Ok(ResponseSnapshot {
                        url: row.get(0)?,
                        status: row.get::<_, i64>(1)? as u16,
                        content_type: row.get(2)?,
                        headers_json: row.get(3)?,
                        body: row.get(4)?,
                        stored_at: row.get(5)?,
                    })
                });

                match result {
                    Ok(s) => Ok(Some(s)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace a stored snapshot.
    ///
    /// Uses UPSERT semantics: a re-fetch of the same identity overwrites the
    /// previous capture in full.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotCacheable` if the snapshot carries a non-success
    /// status; only successful responses are ever written.
    pub async fn put(&self, identity: &str, snapshot: &ResponseSnapshot) -> Result<(), Error> {
        if !(200..300).contains(&snapshot.status) {
            return Err(Error::NotCacheable(format!("status {}", snapshot.status)));
        }

        let generation = self.generation.as_str().to_string();
        let identity = identity.to_string();
        let snapshot = snapshot.clone();
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (
                        generation, identity, url, status, content_type, headers_json, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(generation, identity) DO UPDATE SET
                        url = excluded.url,
                        status = excluded.status,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        generation,
                        identity,
                        &snapshot.url,
                        snapshot.status as i64,
                        &snapshot.content_type,
                        &snapshot.headers_json,
                        &snapshot.body,
                        &snapshot.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries stored under this generation.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        let generation = self.generation.as_str().to_string();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE generation = ?1",
                    params![generation],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

impl CacheDb {
    /// List every generation that has stored entries.
    pub async fn list_generations(&self) -> Result<Vec<Generation>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<Generation>, Error> {
                let mut stmt = conn.prepare("SELECT DISTINCT generation FROM entries ORDER BY generation")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

                let mut generations = Vec::new();
                for row in rows {
                    generations.push(Generation::new(row?));
                }
                Ok(generations)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry belonging to a generation.
    ///
    /// Deleting an absent generation removes zero rows and is not an error,
    /// so activation cleanup can be re-run safely.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_generation(&self, generation: &Generation) -> Result<u64, Error> {
        let generation = generation.as_str().to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries WHERE generation = ?1", params![generation])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
