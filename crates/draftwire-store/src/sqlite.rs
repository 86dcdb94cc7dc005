//! SQLite-backed row store

use async_trait::async_trait;
use draftwire_domain::traits::{RowStore, StoreError};
use draftwire_domain::{Draft, Row, RowRef, Status};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-based implementation of `RowStore`
///
/// Persists rows across restarts so the recovery scan can pick up work
/// submitted before a crash. The connection sits behind a mutex; all
/// statements are short, so contention stays negligible under the
/// single-threaded trigger model.
pub struct SqliteRowStore {
    conn: Mutex<Connection>,
}

impl SqliteRowStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(Self::backend)?;
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(Self::backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn backend(e: rusqlite::Error) -> StoreError {
        StoreError::Backend(e.to_string())
    }

    fn status_from_cell(row: RowRef, cell: &str) -> Result<Status, StoreError> {
        Status::parse(cell).ok_or_else(|| {
            StoreError::Backend(format!("row {} has unknown status cell '{}'", row, cell))
        })
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn append(&self, row: Row) -> Result<RowRef, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO rows (url, tone, summary, post, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &row.url,
                &row.tone,
                &row.summary,
                &row.post,
                row.status.as_cell(),
            ],
        )
        .map_err(Self::backend)?;
        Ok(conn.last_insert_rowid() as RowRef)
    }

    async fn get(&self, row: RowRef) -> Result<Option<Row>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let found = conn
            .query_row(
                "SELECT url, tone, summary, post, status FROM rows WHERE row_ref = ?1",
                params![row as i64],
                |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, String>(3)?,
                        r.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(Self::backend)?;

        match found {
            None => Ok(None),
            Some((url, tone, summary, post, cell)) => Ok(Some(Row {
                url,
                tone,
                summary,
                post,
                status: Self::status_from_cell(row, &cell)?,
            })),
        }
    }

    async fn all(&self) -> Result<Vec<(RowRef, Row)>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT row_ref, url, tone, summary, post, status
                 FROM rows ORDER BY row_ref",
            )
            .map_err(Self::backend)?;

        let rows = stmt
            .query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)? as RowRef,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                ))
            })
            .map_err(Self::backend)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Self::backend)?;

        rows.into_iter()
            .map(|(row_ref, url, tone, summary, post, cell)| {
                Ok((
                    row_ref,
                    Row {
                        url,
                        tone,
                        summary,
                        post,
                        status: Self::status_from_cell(row_ref, &cell)?,
                    },
                ))
            })
            .collect()
    }

    async fn set_status(&self, row: RowRef, status: Status) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE rows SET status = ?1 WHERE row_ref = ?2",
                params![status.as_cell(), row as i64],
            )
            .map_err(Self::backend)?;
        if changed == 0 {
            return Err(StoreError::NotFound(row));
        }
        Ok(())
    }

    async fn set_status_if(
        &self,
        row: RowRef,
        expected: &Status,
        status: Status,
    ) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        // Single UPDATE with the expected status in the predicate keeps
        // the compare-and-set atomic at the database level.
        let changed = conn
            .execute(
                "UPDATE rows SET status = ?1 WHERE row_ref = ?2 AND status = ?3",
                params![status.as_cell(), row as i64, expected.as_cell()],
            )
            .map_err(Self::backend)?;
        if changed > 0 {
            return Ok(true);
        }

        // Distinguish a stale expectation from a missing row
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM rows WHERE row_ref = ?1",
                params![row as i64],
                |_| Ok(true),
            )
            .optional()
            .map_err(Self::backend)?
            .unwrap_or(false);
        if !exists {
            return Err(StoreError::NotFound(row));
        }
        Ok(false)
    }

    async fn set_draft(&self, row: RowRef, draft: &Draft) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE rows SET summary = ?1, post = ?2 WHERE row_ref = ?3",
                params![&draft.summary, &draft.post, row as i64],
            )
            .map_err(Self::backend)?;
        if changed == 0 {
            return Err(StoreError::NotFound(row));
        }
        Ok(())
    }
}
