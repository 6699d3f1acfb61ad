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

//! Transactional key-value storage.
//!
//! # Buckets, keys, and values
//!
//! A store holds opaque byte values under string keys, grouped into
//! [`Bucket`]s. Records are kept in [`Bucket::Records`] and roles in
//! [`Bucket::Roles`]; the key formats and value encodings are up to the
//! modules that own those buckets.
//!
//! # Transactions
//!
//! All access goes through closures passed to [`Store::view`] (read
//! only) and [`Store::update`] (read-write). An update transaction is
//! atomic and isolated from other transactions: its writes become
//! visible together when the closure returns [`Ok`], and are discarded
//! when it returns [`Err`]. This lets a caller load a value, merge
//! changes into it, and write it back without another writer slipping
//! in between.
//!
//! Two implementations are provided: [`MemoryStore`], which keeps
//! everything in a map behind a mutex, and [`SqliteStore`], which
//! persists to an SQLite database.

use std::fmt;

mod memory;
mod sqlite;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

////////////////////////////////////////////////////////////////////////
// STORE TRAITS                                                       //
////////////////////////////////////////////////////////////////////////

/// A named group of keys.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Bucket {
    Records,
    Roles,
}

impl Bucket {
    /// Returns the name of the bucket, as used in persistent storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Roles => "roles",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access within a transaction.
pub trait Transaction {
    /// Returns the value stored under `key`, if any.
    fn get(&self, bucket: Bucket, key: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Returns every key-value pair in `bucket`, sorted by key.
    fn scan(&self, bucket: Bucket) -> Result<Vec<(String, Vec<u8>)>, Error>;
}

/// Read-write access within a transaction. Writes are visible to later
/// reads in the same transaction.
pub trait WriteTransaction: Transaction {
    /// Stores `value` under `key`, replacing any existing value.
    fn put(&mut self, bucket: Bucket, key: &str, value: &[u8]) -> Result<(), Error>;

    /// Removes the value stored under `key`. Returns whether there was
    /// one.
    fn delete(&mut self, bucket: Bucket, key: &str) -> Result<bool, Error>;
}

/// Trait for transactional key-value stores.
///
/// The closures passed to [`Store::view`] and [`Store::update`] may
/// fail with any error type that a store [`Error`] converts into, so
/// that callers can abort a transaction with their own errors.
pub trait Store {
    /// Runs `f` in a read-only transaction.
    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&dyn Transaction) -> Result<T, E>;

    /// Runs `f` in a read-write transaction, committing its writes if it
    /// returns [`Ok`] and discarding them if it returns [`Err`].
    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>;
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that the underlying storage failed.
#[derive(Debug)]
pub enum Error {
    /// The SQLite database reported an error.
    Sqlite(rusqlite::Error),

    /// A thread panicked while holding the store's lock, so its state
    /// can no longer be trusted.
    Poisoned,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "SQLite error: {}", e),
            Self::Poisoned => f.write_str("store lock was poisoned"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::Poisoned => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

////////////////////////////////////////////////////////////////////////
// SHARED TESTS                                                       //
////////////////////////////////////////////////////////////////////////
