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

//! Role-scoped management of DNS resource records kept in a key-value
//! store.
//!
//! Actors are identified by [roles](roles::Role), each carrying an
//! `allow` and a `deny` pattern over owner names. Through
//! [`Records`](records::Records), a role creates, updates, deletes, and
//! reads records of nineteen RR types (see [`rr::RrType`]) at the names
//! its patterns grant it. Request bodies are JSON objects that are
//! checked against a per-type [schema](schema) by the
//! [validator](validate) before being merged into the stored,
//! [typed record](rr::Record). Storage is abstracted by the
//! [`Store`](store::Store) trait, with in-memory and SQLite
//! implementations.
//!
//! Every operation fails with an [`Error`] of one of three kinds:
//! forbidden, bad request, or internal.

pub mod error;
pub mod name;
pub mod policy;
pub mod records;
pub mod roles;
pub mod rr;
pub mod schema;
pub mod store;
pub mod validate;
pub mod wire;

mod util;

pub use error::{Error, ErrorKind};
