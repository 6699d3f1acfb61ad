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

//! Record operations on behalf of roles.
//!
//! # Mutations
//!
//! Creating, updating, and deleting a record each run through the same
//! sequence of [`Stage`]s:
//!
//! 1. the record name is normalized (see [`RecordName`]);
//! 2. **authorizing:** the acting role is loaded and its patterns are
//!    evaluated against the name; an unknown role or a denial fails
//!    with [`Error::Forbidden`];
//! 3. **validating:** the body's `type` member selects a schema, and
//!    the body is checked against it;
//! 4. **loading:** the stored record (if any) is read; updating or
//!    deleting a missing record, or creating one that already exists,
//!    fails with [`Error::BadRequest`];
//! 5. **merging:** the valid fields are merged into the loaded record,
//!    or into an empty one for creation;
//! 6. **persisting:** the record is encoded and written back.
//!
//! The first failure ends the sequence. Loading, merging, and
//! persisting run inside a single [`Store::update`] transaction, so
//! concurrent mutations of one record cannot lose each other's changes,
//! and nothing is written unless every stage succeeds.
//!
//! # Storage layout
//!
//! Records live in [`Bucket::Records`] under the key `"<TYPE> <name>"`,
//! e.g. `"MX example.com."`, so a name holds at most one record of each
//! type. Values are the record's [`Record::encode`] form.

use std::fmt;

use log::{debug, error, info, log_enabled, warn, Level};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, ErrorKind};
use crate::name::RecordName;
use crate::policy;
use crate::roles;
use crate::rr::{Record, RrType, UnknownTypeError};
use crate::schema;
use crate::store::{Bucket, Store, Transaction};
use crate::validate::{self, Mode};

////////////////////////////////////////////////////////////////////////
// OPERATIONS AND STAGES                                              //
////////////////////////////////////////////////////////////////////////

/// An operation a role may be authorized for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Read,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Read => "read",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stages of a mutation. `Done` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Authorizing,
    Validating,
    Loading,
    Merging,
    Persisting,
    Done,
    Failed(ErrorKind),
}

/// Tracks a mutation through its stages for logging.
struct Mutation<'a> {
    operation: Operation,
    role: &'a str,
    name: &'a RecordName,
    stage: Stage,
}

impl<'a> Mutation<'a> {
    fn new(operation: Operation, role: &'a str, name: &'a RecordName) -> Self {
        Self {
            operation,
            role,
            name,
            stage: Stage::Authorizing,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!(
            "{} of record '{}' by role '{}': {:?} -> {:?}",
            self.operation, self.name, self.role, self.stage, stage
        );
        self.stage = stage;
    }

    /// Moves to a terminal stage according to `result`, logging the
    /// outcome.
    fn finish<T>(mut self, result: Result<T, Error>) -> Result<T, Error> {
        match result {
            Ok(value) => {
                self.enter(Stage::Done);
                Ok(value)
            }
            Err(e) => {
                let failed_in = self.stage;
                self.enter(Stage::Failed(e.kind()));
                match e.kind() {
                    ErrorKind::Internal => {
                        error!(
                            "Failed to {} record '{}' while {:?}:",
                            self.operation, self.name, failed_in
                        );
                        log_cause_chain(&e);
                    }
                    ErrorKind::Forbidden | ErrorKind::BadRequest => {
                        debug!(
                            "Rejected {} of record '{}' while {:?}: {}",
                            self.operation, self.name, failed_in, e
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

fn log_cause_chain(e: &Error) {
    if log_enabled!(Level::Error) {
        let mut cause = Some(e as &dyn std::error::Error);
        let mut i = 1;
        while let Some(inner) = cause {
            error!("[{}] {}", i, inner);
            cause = inner.source();
            i += 1;
        }
    }
}

////////////////////////////////////////////////////////////////////////
// RECORD OPERATIONS                                                  //
////////////////////////////////////////////////////////////////////////

/// A stored record together with its owner name, as returned by reads.
/// It serializes like a request body with an added `name` member.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StoredRecord {
    pub name: RecordName,
    #[serde(flatten)]
    pub record: Record,
}

/// Record operations on behalf of roles.
#[derive(Debug)]
pub struct Records<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Records<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Creates a record at `name` from `body`. Every field of the type
    /// must be provided.
    pub fn create(&self, role: &str, name: &str, body: &Value) -> Result<(), Error> {
        self.mutate(Operation::Create, role, name, body)
    }

    /// Updates the record at `name` whose type `body` names. Fields
    /// that `body` omits keep their stored values.
    pub fn update(&self, role: &str, name: &str, body: &Value) -> Result<(), Error> {
        self.mutate(Operation::Update, role, name, body)
    }

    fn mutate(
        &self,
        operation: Operation,
        role: &str,
        name: &str,
        body: &Value,
    ) -> Result<(), Error> {
        let name = normalize(name)?;
        let mut mutation = Mutation::new(operation, role, &name);
        let result = self.run_mutation(&mut mutation, body);
        mutation.finish(result)?;
        info!("Role '{}' {}d record '{}'.", role, operation, name);
        Ok(())
    }

    fn run_mutation(&self, mutation: &mut Mutation, body: &Value) -> Result<(), Error> {
        let operation = mutation.operation;
        let name = mutation.name;
        self.authorize(mutation.role, operation, name)?;

        mutation.enter(Stage::Validating);
        let body = validate::as_object(body)?;
        let rr_type = body
            .get("type")
            .and_then(Value::as_str)
            .ok_or(UnknownTypeError)?
            .parse::<RrType>()?;
        let mode = match operation {
            Operation::Create => Mode::Create,
            _ => Mode::Update,
        };
        let fields = validate::validate(schema::lookup(rr_type), body, mode)?;
        let key = record_key(rr_type, name);

        self.store.update(|txn| {
            mutation.enter(Stage::Loading);
            let stored = load(&*txn, rr_type, &key)?;

            mutation.enter(Stage::Merging);
            let record = match (operation, stored) {
                (Operation::Create, None) => Record::create(rr_type, &fields),
                (Operation::Create, Some(_)) => {
                    return Err(Error::bad_request("specified record already exists"));
                }
                (_, Some(mut record)) => {
                    record.merge(&fields);
                    record
                }
                (_, None) => return Err(Error::bad_request("specified record does not exist")),
            };

            mutation.enter(Stage::Persisting);
            let octets = record
                .encode()
                .map_err(|e| Error::internal("failed to encode record", e))?;
            txn.put(Bucket::Records, &key, &octets)
                .map_err(|e| Error::internal("failed to write record to database", e))
        })
    }

    /// Deletes the record of type `rr_type` at `name`.
    pub fn delete(&self, role: &str, name: &str, rr_type: &str) -> Result<(), Error> {
        let name = normalize(name)?;
        let mut mutation = Mutation::new(Operation::Delete, role, &name);
        let result = self.run_delete(&mut mutation, rr_type);
        mutation.finish(result)?;
        info!("Role '{}' deleted record '{}'.", role, name);
        Ok(())
    }

    fn run_delete(&self, mutation: &mut Mutation, rr_type: &str) -> Result<(), Error> {
        let name = mutation.name;
        self.authorize(mutation.role, Operation::Delete, name)?;

        mutation.enter(Stage::Validating);
        let rr_type = rr_type.parse::<RrType>()?;
        let key = record_key(rr_type, name);

        self.store.update(|txn| {
            mutation.enter(Stage::Persisting);
            let deleted = txn
                .delete(Bucket::Records, &key)
                .map_err(|e| Error::internal("failed to delete record from database", e))?;
            if deleted {
                Ok(())
            } else {
                Err(Error::bad_request("specified record does not exist"))
            }
        })
    }

    /// Returns the record of type `rr_type` at `name`.
    pub fn get(&self, role: &str, name: &str, rr_type: &str) -> Result<StoredRecord, Error> {
        let name = normalize(name)?;
        self.authorize(role, Operation::Read, &name)?;
        let rr_type = rr_type.parse::<RrType>()?;
        let key = record_key(rr_type, &name);
        match self.store.view(|txn| load(txn, rr_type, &key))? {
            Some(record) => Ok(StoredRecord { name, record }),
            None => Err(Error::bad_request("specified record does not exist")),
        }
    }

    /// Returns every record that `role` may read, sorted by name and
    /// then by type.
    pub fn list(&self, role: &str) -> Result<Vec<StoredRecord>, Error> {
        let mut records = self.store.view(|txn| {
            let role_data = roles::load(txn, role)?.ok_or_else(|| {
                warn!("Unknown role '{}' attempted to list records.", role);
                Error::Forbidden(format!("role '{}' is not allowed to list records", role))
            })?;

            let mut records = Vec::new();
            for (key, octets) in txn.scan(Bucket::Records)? {
                let (rr_type, name) = parse_record_key(&key).ok_or_else(|| {
                    Error::internal(
                        "failed to read record from database",
                        format!("malformed record key '{}'", key),
                    )
                })?;
                if policy::evaluate(&role_data, &name) {
                    let record = Record::decode(rr_type, &octets)
                        .map_err(|e| Error::internal("failed to read record from database", e))?;
                    records.push(StoredRecord { name, record });
                }
            }
            Ok::<_, Error>(records)
        })?;
        records.sort_by(|a, b| {
            (&a.name, a.record.rr_type()).cmp(&(&b.name, b.record.rr_type()))
        });
        Ok(records)
    }

    /// Checks that `role` exists and may perform `operation` on records
    /// at `name`.
    fn authorize(&self, role: &str, operation: Operation, name: &RecordName) -> Result<(), Error> {
        let allowed = match self.store.view(|txn| roles::load(txn, role))? {
            Some(role_data) => policy::evaluate(&role_data, name),
            None => {
                warn!("Unknown role '{}' attempted to {} record '{}'.", role, operation, name);
                false
            }
        };
        if allowed {
            Ok(())
        } else {
            warn!("Role '{}' denied {} of record '{}'.", role, operation, name);
            Err(Error::Forbidden(format!(
                "role '{}' is not allowed to {} record '{}'",
                role, operation, name
            )))
        }
    }
}

////////////////////////////////////////////////////////////////////////
// HELPERS                                                            //
////////////////////////////////////////////////////////////////////////

fn normalize(name: &str) -> Result<RecordName, Error> {
    name.parse()
        .map_err(|e| Error::bad_request(format!("invalid record name '{}': {}", name, e)))
}

fn record_key(rr_type: RrType, name: &RecordName) -> String {
    format!("{} {}", rr_type, name)
}

fn parse_record_key(key: &str) -> Option<(RrType, RecordName)> {
    let (rr_type, name) = key.split_once(' ')?;
    Some((rr_type.parse().ok()?, name.parse().ok()?))
}

/// Loads the record stored under `key`. An absent record is not an
/// error.
fn load<T>(txn: &T, rr_type: RrType, key: &str) -> Result<Option<Record>, Error>
where
    T: Transaction + ?Sized,
{
    match txn.get(Bucket::Records, key)? {
        Some(octets) => Record::decode(rr_type, &octets)
            .map(Some)
            .map_err(|e| Error::internal("failed to read record from database", e)),
        None => Ok(None),
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use serde_json::json;

    use super::*;
    use crate::roles::{Roles, ADMIN_ROLE};
    use crate::rr::rdata::{Loc, A};
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        roles::bootstrap(&store).unwrap();
        Roles::new(&store)
            .create(
                ADMIN_ROLE,
                "ops",
                &json!({
                    "description": "Operations",
                    "allow": "*.example.com",
                    "deny": "secret.example.com",
                }),
            )
            .unwrap();
        store
    }

    fn snapshot(store: &MemoryStore) -> Vec<(String, Vec<u8>)> {
        store.view(|txn| txn.scan(Bucket::Records)).unwrap()
    }

    fn a_record(host: &str) -> Value {
        json!({ "type": "A", "host": host })
    }

    fn loc_body(lat_degrees: u64) -> Value {
        json!({
            "type": "LOC",
            "version": 0,
            "size": 18,
            "horizontal-precision": 22,
            "vertical-precision": 19,
            "altitude": 10_000_000,
            "lat-degrees": lat_degrees,
            "lat-minutes": 0,
            "lat-seconds": 0,
            "lat-direction": "S",
            "long-degrees": 4,
            "long-minutes": 53,
            "long-seconds": 32,
            "long-direction": "E",
        })
    }

    #[test]
    fn create_then_get() {
        let store = store();
        let records = Records::new(&store);
        records
            .create("ops", "WWW.example.com", &a_record("10.0.0.5"))
            .unwrap();
        let stored = records.get("ops", "www.example.com.", "a").unwrap();
        assert_eq!(stored.name.as_str(), "www.example.com.");
        assert_eq!(
            stored.record,
            Record::A(A {
                host: Ipv4Addr::new(10, 0, 0, 5),
            }),
        );
        assert_eq!(
            serde_json::to_value(&stored).unwrap(),
            json!({ "name": "www.example.com.", "type": "A", "host": "10.0.0.5" }),
        );
    }

    #[test]
    fn single_field_update_of_a_record() {
        let store = store();
        let records = Records::new(&store);
        records
            .create("ops", "www.example.com", &a_record("10.0.0.5"))
            .unwrap();
        records
            .update("ops", "www.example.com", &a_record("10.0.0.6"))
            .unwrap();
        let stored = records.get("ops", "www.example.com", "A").unwrap();
        assert_eq!(
            stored.record,
            Record::A(A {
                host: Ipv4Addr::new(10, 0, 0, 6),
            }),
        );
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let store = store();
        let records = Records::new(&store);
        records
            .create(
                "ops",
                "_sip._tcp.example.com",
                &json!({
                    "type": "SRV",
                    "priority": 10,
                    "weight": 5,
                    "port": 5060,
                    "target": "sip.example.com.",
                }),
            )
            .unwrap();
        records
            .update(
                "ops",
                "_sip._tcp.example.com",
                &json!({ "type": "srv", "port": 5061 }),
            )
            .unwrap();
        let stored = records.get("ops", "_sip._tcp.example.com", "SRV").unwrap();
        assert_eq!(
            serde_json::to_value(&stored.record).unwrap(),
            json!({
                "type": "SRV",
                "priority": 10,
                "weight": 5,
                "port": 5061,
                "target": "sip.example.com.",
            }),
        );
    }

    #[test]
    fn updates_are_idempotent() {
        let store = store();
        let records = Records::new(&store);
        records
            .create("ops", "www.example.com", &a_record("10.0.0.5"))
            .unwrap();
        records
            .update("ops", "www.example.com", &a_record("10.0.0.7"))
            .unwrap();
        let once = snapshot(&store);
        records
            .update("ops", "www.example.com", &a_record("10.0.0.7"))
            .unwrap();
        assert_eq!(snapshot(&store), once);
    }

    #[test]
    fn update_requires_existence() {
        let store = store();
        let records = Records::new(&store);
        let error = records
            .update("ops", "www.example.com", &a_record("10.0.0.5"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.to_string(), "specified record does not exist");
        assert!(snapshot(&store).is_empty());
    }

    #[test]
    fn create_refuses_existing_records() {
        let store = store();
        let records = Records::new(&store);
        records
            .create("ops", "www.example.com", &a_record("10.0.0.5"))
            .unwrap();
        let error = records
            .create("ops", "www.example.com", &a_record("10.0.0.6"))
            .unwrap_err();
        assert_eq!(error.to_string(), "specified record already exists");
        let stored = records.get("ops", "www.example.com", "A").unwrap();
        assert_eq!(
            stored.record,
            Record::A(A {
                host: Ipv4Addr::new(10, 0, 0, 5),
            }),
        );
    }

    #[test]
    fn create_requires_every_field() {
        let store = store();
        let error = Records::new(&store)
            .create("ops", "mail.example.com", &json!({ "type": "MX", "priority": 10 }))
            .unwrap_err();
        assert_eq!(error.to_string(), "field 'host' is required");
        assert!(snapshot(&store).is_empty());
    }

    #[test]
    fn deny_overrides_allow() {
        let store = store();
        let error = Records::new(&store)
            .create("ops", "secret.example.com", &a_record("10.0.0.5"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(
            error.to_string(),
            "role 'ops' is not allowed to create record 'secret.example.com.'",
        );
        assert!(snapshot(&store).is_empty());
    }

    #[test]
    fn names_outside_allow_are_denied() {
        let store = store();
        let records = Records::new(&store);
        for name in ["example.com", "www.example.org"] {
            let error = records.create("ops", name, &a_record("10.0.0.5")).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Forbidden);
        }
        assert!(snapshot(&store).is_empty());
    }

    #[test]
    fn unknown_roles_are_forbidden() {
        let store = store();
        let records = Records::new(&store);
        let error = records
            .create("nobody", "www.example.com", &a_record("10.0.0.5"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(records.list("nobody").unwrap_err().kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn authorization_precedes_validation() {
        let store = store();
        let error = Records::new(&store)
            .create("ops", "secret.example.com", &json!({ "type": "BOGUS" }))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn unknown_types_are_rejected_with_the_valid_list() {
        let store = store();
        let records = Records::new(&store);
        for body in [json!({ "type": "BOGUS" }), json!({ "host": "10.0.0.5" })] {
            let error = records.create("ops", "www.example.com", &body).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::BadRequest);
            assert_eq!(
                error.to_string(),
                "field 'type' must be one of: A, AAAA, CNAME, MX, LOC, SRV, SPF, TXT, \
                 NS, CAA, PTR, CERT, DNSKEY, DS, NAPTR, SMIMEA, SSHFP, TLSA, URI",
            );
        }
    }

    #[test]
    fn loc_latitude_is_bounded() {
        let store = store();
        let records = Records::new(&store);
        let error = records
            .create("ops", "geo.example.com", &loc_body(91))
            .unwrap_err();
        assert_eq!(error.to_string(), "field 'lat-degrees' must be between 0 and 90");
        assert!(snapshot(&store).is_empty());

        records
            .create("ops", "geo.example.com", &loc_body(90))
            .unwrap();
        let stored = records.get("ops", "geo.example.com", "LOC").unwrap();
        match stored.record {
            Record::LOC(Loc { lat_degrees, .. }) => assert_eq!(lat_degrees, 90),
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn loc_update_requires_every_field() {
        let store = store();
        let records = Records::new(&store);
        records
            .create("ops", "geo.example.com", &loc_body(52))
            .unwrap();
        let error = records
            .update(
                "ops",
                "geo.example.com",
                &json!({ "type": "LOC", "altitude": 5 }),
            )
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn delete_removes_only_the_named_type() {
        let store = store();
        let records = Records::new(&store);
        records
            .create("ops", "www.example.com", &a_record("10.0.0.5"))
            .unwrap();
        records
            .create(
                "ops",
                "www.example.com",
                &json!({ "type": "TXT", "text": ["hello", "world"] }),
            )
            .unwrap();

        records.delete("ops", "www.example.com", "a").unwrap();
        assert!(records.get("ops", "www.example.com", "A").is_err());
        let txt = records.get("ops", "www.example.com", "TXT").unwrap();
        assert_eq!(
            serde_json::to_value(&txt.record).unwrap(),
            json!({ "type": "TXT", "text": "hello world" }),
        );

        let error = records.delete("ops", "www.example.com", "A").unwrap_err();
        assert_eq!(error.to_string(), "specified record does not exist");
    }

    #[test]
    fn list_filters_and_sorts() {
        let store = store();
        Records::new(&store)
            .create(ADMIN_ROLE, "secret.example.com", &a_record("10.0.0.1"))
            .unwrap();
        Records::new(&store)
            .create(ADMIN_ROLE, "example.org", &a_record("10.0.0.2"))
            .unwrap();
        let records = Records::new(&store);
        records
            .create(
                "ops",
                "www.example.com",
                &json!({ "type": "MX", "host": "mail.example.com.", "priority": 10 }),
            )
            .unwrap();
        records
            .create("ops", "www.example.com", &a_record("10.0.0.3"))
            .unwrap();
        records
            .create("ops", "api.example.com", &a_record("10.0.0.4"))
            .unwrap();

        let listed: Vec<_> = records
            .list("ops")
            .unwrap()
            .into_iter()
            .map(|stored| format!("{} {}", stored.name, stored.record.rr_type()))
            .collect();
        assert_eq!(
            listed,
            [
                "api.example.com. A",
                "www.example.com. A",
                "www.example.com. MX",
            ],
        );
        assert_eq!(records.list(ADMIN_ROLE).unwrap().len(), 5);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let store = store();
        let error = Records::new(&store)
            .create("ops", "a..example.com", &a_record("10.0.0.5"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn corrupt_records_are_internal_errors() {
        let store = store();
        store
            .update(|txn| txn.put(Bucket::Records, "A www.example.com.", b"\x0a"))
            .unwrap();
        let records = Records::new(&store);
        let error = records.get("ops", "www.example.com", "A").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert_eq!(error.to_string(), "failed to read record from database");

        let error = records
            .update("ops", "www.example.com", &a_record("10.0.0.5"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn oversized_fields_fail_to_persist() {
        let store = store();
        let long = "x".repeat(70_000);
        let error = Records::new(&store)
            .create(
                "ops",
                "www.example.com",
                &json!({ "type": "CAA", "tag": "issue", "content": long }),
            )
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(snapshot(&store).is_empty());
    }
}
