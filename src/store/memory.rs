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

//! Implementation of the [`MemoryStore`] type.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{Bucket, Error, Store, Transaction, WriteTransaction};

type Map = BTreeMap<(Bucket, String), Vec<u8>>;

/// A [`Store`] that keeps its data in memory.
///
/// Transactions are serialized by a mutex that is held for the whole
/// closure. Writes are staged in the transaction and applied to the
/// map only on commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<Map>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&dyn Transaction) -> Result<T, E>,
    {
        let map = self.map.lock().map_err(|_| Error::Poisoned)?;
        f(&MemoryTransaction::new(&map))
    }

    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
    {
        let mut map = self.map.lock().map_err(|_| Error::Poisoned)?;
        let mut txn = MemoryTransaction::new(&map);
        let value = f(&mut txn)?;
        let staged = txn.staged;
        for (key, change) in staged {
            match change {
                Some(value) => map.insert(key, value),
                None => map.remove(&key),
            };
        }
        Ok(value)
    }
}

////////////////////////////////////////////////////////////////////////
// TRANSACTIONS                                                       //
////////////////////////////////////////////////////////////////////////

/// A transaction over a [`MemoryStore`]. Staged changes map keys to
/// their new values, or to [`None`] for deletions.
struct MemoryTransaction<'a> {
    base: &'a Map,
    staged: BTreeMap<(Bucket, String), Option<Vec<u8>>>,
}

impl<'a> MemoryTransaction<'a> {
    fn new(base: &'a Map) -> Self {
        Self {
            base,
            staged: BTreeMap::new(),
        }
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn get(&self, bucket: Bucket, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let key = (bucket, key.to_owned());
        match self.staged.get(&key) {
            Some(change) => Ok(change.clone()),
            None => Ok(self.base.get(&key).cloned()),
        }
    }

    fn scan(&self, bucket: Bucket) -> Result<Vec<(String, Vec<u8>)>, Error> {
        let mut entries: BTreeMap<&str, &[u8]> = self
            .base
            .iter()
            .filter(|((b, _), _)| *b == bucket)
            .map(|((_, key), value)| (key.as_str(), value.as_slice()))
            .collect();
        for ((b, key), change) in &self.staged {
            if *b != bucket {
                continue;
            }
            match change {
                Some(value) => entries.insert(key.as_str(), value.as_slice()),
                None => entries.remove(key.as_str()),
            };
        }
        Ok(entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.to_vec()))
            .collect())
    }
}

impl WriteTransaction for MemoryTransaction<'_> {
    fn put(&mut self, bucket: Bucket, key: &str, value: &[u8]) -> Result<(), Error> {
        self.staged
            .insert((bucket, key.to_owned()), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, bucket: Bucket, key: &str) -> Result<bool, Error> {
        let existed = self.get(bucket, key)?.is_some();
        self.staged.insert((bucket, key.to_owned()), None);
        Ok(existed)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::super::conformance;
    use super::*;

    #[test]
    fn writes_are_visible_after_commit() {
        conformance::writes_are_visible_after_commit(&MemoryStore::new());
    }

    #[test]
    fn failed_updates_roll_back() {
        conformance::failed_updates_roll_back(&MemoryStore::new());
    }

    #[test]
    fn buckets_are_separate_and_scans_are_sorted() {
        conformance::buckets_are_separate_and_scans_are_sorted(&MemoryStore::new());
    }

    #[test]
    fn deletes_report_presence() {
        conformance::deletes_report_presence(&MemoryStore::new());
    }
}
