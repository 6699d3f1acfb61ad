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

//! Roles and their administration.
//!
//! A [`Role`] names an actor and carries the `allow` and `deny`
//! patterns that [`policy::evaluate`](crate::policy::evaluate) checks
//! record names against. Roles are kept in [`Bucket::Roles`] under
//! their names. Only the [`ADMIN_ROLE`] may read or change them, and
//! that role can never be deleted, so some actor can always manage the
//! others.

use log::info;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::policy::Pattern;
use crate::schema;
use crate::store::{Bucket, Store, Transaction};
use crate::validate::{self, Mode};
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

/// The name of the role allowed to administer roles.
pub const ADMIN_ROLE: &str = "admin";

////////////////////////////////////////////////////////////////////////
// ROLES                                                              //
////////////////////////////////////////////////////////////////////////

/// A named actor and its access patterns.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub allow: String,
    pub deny: String,
}

impl Role {
    /// Returns the stored encoding of the role. The name is carried by
    /// the storage key.
    fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        writer.string("description", &self.description)?;
        writer.string("allow", &self.allow)?;
        writer.string("deny", &self.deny)?;
        Ok(writer.finish())
    }

    fn decode(name: &str, octets: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(octets);
        let role = Self {
            name: name.to_owned(),
            description: reader.string()?,
            allow: reader.string()?,
            deny: reader.string()?,
        };
        reader.finish()?;
        Ok(role)
    }
}

/// Loads the role called `name` within a transaction.
pub(crate) fn load<T>(txn: &T, name: &str) -> Result<Option<Role>, Error>
where
    T: Transaction + ?Sized,
{
    match txn.get(Bucket::Roles, name)? {
        Some(octets) => Role::decode(name, &octets)
            .map(Some)
            .map_err(|e| Error::internal("failed to read role from database", e)),
        None => Ok(None),
    }
}

/// Creates the [`ADMIN_ROLE`], allowed to access every name, if it
/// does not exist yet. Returns whether it was created.
pub fn bootstrap<S: Store>(store: &S) -> Result<bool, Error> {
    store.update(|txn| {
        if txn.get(Bucket::Roles, ADMIN_ROLE)?.is_some() {
            return Ok(false);
        }
        let admin = Role {
            name: ADMIN_ROLE.to_owned(),
            description: "Administrator".to_owned(),
            allow: "*".to_owned(),
            deny: String::new(),
        };
        let octets = admin
            .encode()
            .map_err(|e| Error::internal("failed to encode role", e))?;
        txn.put(Bucket::Roles, ADMIN_ROLE, &octets)?;
        info!("Created role '{}'.", ADMIN_ROLE);
        Ok(true)
    })
}

////////////////////////////////////////////////////////////////////////
// ADMINISTRATION                                                     //
////////////////////////////////////////////////////////////////////////

/// Role administration on behalf of actors.
#[derive(Debug)]
pub struct Roles<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Roles<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Creates the role `name` from a body with `description`, `allow`,
    /// and `deny` members.
    pub fn create(&self, actor: &str, name: &str, body: &Value) -> Result<(), Error> {
        self.write(actor, name, body, Mode::Create)
    }

    /// Replaces the role `name` with the contents of a body.
    pub fn update(&self, actor: &str, name: &str, body: &Value) -> Result<(), Error> {
        self.write(actor, name, body, Mode::Update)
    }

    fn write(&self, actor: &str, name: &str, body: &Value, mode: Mode) -> Result<(), Error> {
        require_admin(actor)?;
        check_name(name)?;
        let fields = validate::validate(&schema::ROLE, validate::as_object(body)?, mode)?;
        let field = |member: &str| fields.string(member).unwrap_or_default().to_owned();
        let role = Role {
            name: name.to_owned(),
            description: field("description"),
            allow: field("allow"),
            deny: field("deny"),
        };
        for pattern in [&role.allow, &role.deny] {
            pattern
                .parse::<Pattern>()
                .map_err(|e| Error::bad_request(e.to_string()))?;
        }
        let octets = role
            .encode()
            .map_err(|e| Error::internal("failed to encode role", e))?;

        self.store.update(|txn| {
            let exists = txn.get(Bucket::Roles, name)?.is_some();
            match mode {
                Mode::Create if exists => {
                    return Err(Error::bad_request("specified role already exists"))
                }
                Mode::Update if !exists => {
                    return Err(Error::bad_request("specified role does not exist"))
                }
                _ => (),
            }
            txn.put(Bucket::Roles, name, &octets)
                .map_err(|e| Error::internal("failed to write role to database", e))
        })?;
        info!("Role '{}' wrote role '{}'.", actor, name);
        Ok(())
    }

    /// Deletes the role `name`. The [`ADMIN_ROLE`] cannot be deleted.
    pub fn delete(&self, actor: &str, name: &str) -> Result<(), Error> {
        require_admin(actor)?;
        if name == ADMIN_ROLE {
            return Err(Error::bad_request(format!(
                "role '{}' cannot be deleted",
                ADMIN_ROLE
            )));
        }
        self.store.update(|txn| {
            let deleted = txn
                .delete(Bucket::Roles, name)
                .map_err(|e| Error::internal("failed to delete role from database", e))?;
            if deleted {
                Ok(())
            } else {
                Err(Error::bad_request("specified role does not exist"))
            }
        })?;
        info!("Role '{}' deleted role '{}'.", actor, name);
        Ok(())
    }

    pub fn get(&self, actor: &str, name: &str) -> Result<Role, Error> {
        require_admin(actor)?;
        self.store
            .view(|txn| load(txn, name))?
            .ok_or_else(|| Error::bad_request("specified role does not exist"))
    }

    /// Returns every role, sorted by name.
    pub fn list(&self, actor: &str) -> Result<Vec<Role>, Error> {
        require_admin(actor)?;
        self.store.view(|txn| {
            txn.scan(Bucket::Roles)?
                .into_iter()
                .map(|(name, octets)| {
                    Role::decode(&name, &octets)
                        .map_err(|e| Error::internal("failed to read role from database", e))
                })
                .collect()
        })
    }
}

fn require_admin(actor: &str) -> Result<(), Error> {
    if actor == ADMIN_ROLE {
        Ok(())
    } else {
        Err(Error::Forbidden(format!("role must be '{}'", ADMIN_ROLE)))
    }
}

/// Checks that a role name is non-empty and made of ASCII letters,
/// digits, hyphens, and underscores.
fn check_name(name: &str) -> Result<(), Error> {
    if !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        Ok(())
    } else {
        Err(Error::bad_request(format!("invalid role name '{}'", name)))
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        assert!(bootstrap(&store).unwrap());
        store
    }

    fn ops_body() -> Value {
        json!({
            "description": "Operations",
            "allow": "*.example.com",
            "deny": "secret.example.com",
        })
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let store = store();
        assert!(!bootstrap(&store).unwrap());
        let admin = Roles::new(&store).get(ADMIN_ROLE, ADMIN_ROLE).unwrap();
        assert_eq!(admin.allow, "*");
        assert_eq!(admin.deny, "");
    }

    #[test]
    fn only_admin_may_administer() {
        let store = store();
        let roles = Roles::new(&store);
        roles.create(ADMIN_ROLE, "ops", &ops_body()).unwrap();

        let error = roles.create("ops", "other", &ops_body()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(error.to_string(), "role must be 'admin'");
        assert_eq!(roles.list("ops").unwrap_err().kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn create_get_update_delete() {
        let store = store();
        let roles = Roles::new(&store);
        roles.create(ADMIN_ROLE, "ops", &ops_body()).unwrap();
        assert_eq!(
            roles.get(ADMIN_ROLE, "ops").unwrap(),
            Role {
                name: "ops".into(),
                description: "Operations".into(),
                allow: "*.example.com".into(),
                deny: "secret.example.com".into(),
            },
        );

        let error = roles.create(ADMIN_ROLE, "ops", &ops_body()).unwrap_err();
        assert_eq!(error.to_string(), "specified role already exists");

        let body = json!({ "description": "Ops", "allow": "*", "deny": "" });
        roles.update(ADMIN_ROLE, "ops", &body).unwrap();
        assert_eq!(roles.get(ADMIN_ROLE, "ops").unwrap().allow, "*");

        let names: Vec<_> = roles
            .list(ADMIN_ROLE)
            .unwrap()
            .into_iter()
            .map(|role| role.name)
            .collect();
        assert_eq!(names, ["admin", "ops"]);

        roles.delete(ADMIN_ROLE, "ops").unwrap();
        let error = roles.get(ADMIN_ROLE, "ops").unwrap_err();
        assert_eq!(error.to_string(), "specified role does not exist");
    }

    #[test]
    fn updating_or_deleting_missing_roles_fails() {
        let store = store();
        let roles = Roles::new(&store);
        let error = roles.update(ADMIN_ROLE, "ghost", &ops_body()).unwrap_err();
        assert_eq!(error.to_string(), "specified role does not exist");
        let error = roles.delete(ADMIN_ROLE, "ghost").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn admin_cannot_be_deleted() {
        let store = store();
        let error = Roles::new(&store).delete(ADMIN_ROLE, ADMIN_ROLE).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(load_admin(&store).is_some());
    }

    fn load_admin(store: &MemoryStore) -> Option<Role> {
        store.view(|txn| load(txn, ADMIN_ROLE)).unwrap()
    }

    #[test]
    fn bodies_and_patterns_are_validated() {
        let store = store();
        let roles = Roles::new(&store);

        let error = roles
            .create(ADMIN_ROLE, "ops", &json!({ "description": "x", "allow": "*" }))
            .unwrap_err();
        assert_eq!(error.to_string(), "field 'deny' is required");

        let body = json!({ "description": "x", "allow": "a..b", "deny": "" });
        let error = roles.create(ADMIN_ROLE, "ops", &body).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let error = roles.create(ADMIN_ROLE, "bad name", &ops_body()).unwrap_err();
        assert_eq!(error.to_string(), "invalid role name 'bad name'");

        assert_eq!(roles.list(ADMIN_ROLE).unwrap().len(), 1);
    }
}
