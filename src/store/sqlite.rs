// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of the [`SqliteStore`] type.

use std::path::Path;
use std::sync::Mutex;

use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::{Bucket, Error, Store, Transaction, WriteTransaction};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    bucket TEXT NOT NULL,
    key TEXT NOT NULL,
    value BLOB NOT NULL,
    PRIMARY KEY (bucket, key)
)";

/// A [`Store`] backed by an SQLite database.
///
/// All buckets share a single table keyed by bucket name and key.
/// Update transactions are opened `IMMEDIATE`, so that they take the
/// database's write lock before reading anything.
#[derive(Debug)]
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if necessary) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Opening SQLite database {}.", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a private, temporary in-memory database.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self, Error> {
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl Store for SqliteStore {
    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&dyn Transaction) -> Result<T, E>,
    {
        let mut connection = self.connection.lock().map_err(|_| Error::Poisoned)?;
        let txn = SqliteTransaction {
            inner: connection.transaction().map_err(Error::from)?,
        };
        // Dropping the transaction rolls it back, which for a read-only
        // transaction simply releases it.
        f(&txn)
    }

    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
    {
        let mut connection = self.connection.lock().map_err(|_| Error::Poisoned)?;
        let mut txn = SqliteTransaction {
            inner: connection
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(Error::from)?,
        };
        match f(&mut txn) {
            Ok(value) => {
                txn.inner.commit().map_err(Error::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_error) = txn.inner.rollback() {
                    error!(
                        "Failed to roll back transaction after error: {}",
                        rollback_error
                    );
                }
                Err(e)
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TRANSACTIONS                                                       //
////////////////////////////////////////////////////////////////////////

struct SqliteTransaction<'a> {
    inner: rusqlite::Transaction<'a>,
}

impl Transaction for SqliteTransaction<'_> {
    fn get(&self, bucket: Bucket, key: &str) -> Result<Option<Vec<u8>>, Error> {
        self.inner
            .query_row(
                "SELECT value FROM kv WHERE bucket = ?1 AND key = ?2",
                params![bucket.as_str(), key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn scan(&self, bucket: Bucket) -> Result<Vec<(String, Vec<u8>)>, Error> {
        let mut statement = self
            .inner
            .prepare("SELECT key, value FROM kv WHERE bucket = ?1 ORDER BY key")?;
        let rows = statement.query_map(params![bucket.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl WriteTransaction for SqliteTransaction<'_> {
    fn put(&mut self, bucket: Bucket, key: &str, value: &[u8]) -> Result<(), Error> {
        self.inner.execute(
            "INSERT OR REPLACE INTO kv (bucket, key, value) VALUES (?1, ?2, ?3)",
            params![bucket.as_str(), key, value],
        )?;
        Ok(())
    }

    fn delete(&mut self, bucket: Bucket, key: &str) -> Result<bool, Error> {
        let deleted = self.inner.execute(
            "DELETE FROM kv WHERE bucket = ?1 AND key = ?2",
            params![bucket.as_str(), key],
        )?;
        Ok(deleted > 0)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::super::conformance;
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn writes_are_visible_after_commit() {
        conformance::writes_are_visible_after_commit(&store());
    }

    #[test]
    fn failed_updates_roll_back() {
        conformance::failed_updates_roll_back(&store());
    }

    #[test]
    fn buckets_are_separate_and_scans_are_sorted() {
        conformance::buckets_are_separate_and_scans_are_sorted(&store());
    }

    #[test]
    fn deletes_report_presence() {
        conformance::deletes_report_presence(&store());
    }

    #[test]
    fn data_persists_across_connections() {
        let path = std::env::temp_dir().join(format!(
            "zonemgr-test-{}.sqlite3",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .update(|txn| txn.put(Bucket::Roles, "admin", b"x"))
                .unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let value = store.view(|txn| txn.get(Bucket::Roles, "admin")).unwrap();
        assert_eq!(value, Some(b"x".to_vec()));
        drop(store);
        std::fs::remove_file(&path).unwrap();
    }
}
