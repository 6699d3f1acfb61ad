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

//! Implementation of the [`Record`] type: typed record data, its merge
//! with validated request fields, and its stored encoding.

use serde::Serialize;

use super::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

// Implementation helpers.
mod helpers;

// Implementations of RR types.
mod caa;
mod cert;
mod dane;
mod dnssec;
mod ipv6;
mod loc;
mod naptr;
mod spf;
mod srv;
mod sshfp;
mod std13;
mod uri;
pub use caa::*;
pub use cert::*;
pub use dane::*;
pub use dnssec::*;
pub use ipv6::*;
pub use loc::*;
pub use naptr::*;
pub use spf::*;
pub use srv::*;
pub use sshfp::*;
pub use std13::*;
pub use uri::*;

////////////////////////////////////////////////////////////////////////
// RECORD DATA TRAIT                                                  //
////////////////////////////////////////////////////////////////////////

/// The behavior shared by the data structures of every RR type.
///
/// The [`Default`] value of a structure is the starting point for a
/// newly created record, into which the request's fields are then
/// merged.
pub trait RecordData: Clone + Default + Sized {
    /// The RR type this structure holds data for.
    const TYPE: RrType;

    /// Overwrites exactly those fields that `fields` marks as valid,
    /// leaving the rest untouched.
    fn merge(&mut self, fields: &ValidFields);

    /// Writes the stored encoding of the data.
    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError>;

    /// Reads data previously written by [`RecordData::write`].
    fn read(reader: &mut Reader) -> Result<Self, DecodeError>;
}

fn type_of<T: RecordData>(_: &T) -> RrType {
    T::TYPE
}

fn decode_as<T: RecordData>(octets: &[u8]) -> Result<T, DecodeError> {
    let mut reader = Reader::new(octets);
    let data = T::read(&mut reader)?;
    reader.finish()?;
    Ok(data)
}

////////////////////////////////////////////////////////////////////////
// RECORD TYPE                                                        //
////////////////////////////////////////////////////////////////////////

/// The data of a single record of any managed RR type.
///
/// A `Record` serializes to a JSON object with a `type` member holding
/// the type mnemonic and one member per schema field, e.g.
/// `{"type":"MX","host":"mail.example.com.","priority":10}`.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Record {
    A(A),
    AAAA(Aaaa),
    CNAME(Cname),
    MX(Mx),
    LOC(Loc),
    SRV(Srv),
    SPF(Spf),
    TXT(Txt),
    NS(Ns),
    CAA(Caa),
    PTR(Ptr),
    CERT(Cert),
    DNSKEY(Dnskey),
    DS(Ds),
    NAPTR(Naptr),
    SMIMEA(Smimea),
    SSHFP(Sshfp),
    TLSA(Tlsa),
    URI(Uri),
}

/// Evaluates `$body` with `$data` bound to the structure inside a
/// [`Record`], whatever its variant.
macro_rules! dispatch {
    ($record:expr, $data:ident => $body:expr) => {
        match $record {
            Record::A($data) => $body,
            Record::AAAA($data) => $body,
            Record::CNAME($data) => $body,
            Record::MX($data) => $body,
            Record::LOC($data) => $body,
            Record::SRV($data) => $body,
            Record::SPF($data) => $body,
            Record::TXT($data) => $body,
            Record::NS($data) => $body,
            Record::CAA($data) => $body,
            Record::PTR($data) => $body,
            Record::CERT($data) => $body,
            Record::DNSKEY($data) => $body,
            Record::DS($data) => $body,
            Record::NAPTR($data) => $body,
            Record::SMIMEA($data) => $body,
            Record::SSHFP($data) => $body,
            Record::TLSA($data) => $body,
            Record::URI($data) => $body,
        }
    };
}

impl Record {
    /// Returns a record of type `rr_type` with every field at its
    /// default value.
    pub fn empty(rr_type: RrType) -> Self {
        match rr_type {
            RrType::A => Self::A(Default::default()),
            RrType::AAAA => Self::AAAA(Default::default()),
            RrType::CNAME => Self::CNAME(Default::default()),
            RrType::MX => Self::MX(Default::default()),
            RrType::LOC => Self::LOC(Default::default()),
            RrType::SRV => Self::SRV(Default::default()),
            RrType::SPF => Self::SPF(Default::default()),
            RrType::TXT => Self::TXT(Default::default()),
            RrType::NS => Self::NS(Default::default()),
            RrType::CAA => Self::CAA(Default::default()),
            RrType::PTR => Self::PTR(Default::default()),
            RrType::CERT => Self::CERT(Default::default()),
            RrType::DNSKEY => Self::DNSKEY(Default::default()),
            RrType::DS => Self::DS(Default::default()),
            RrType::NAPTR => Self::NAPTR(Default::default()),
            RrType::SMIMEA => Self::SMIMEA(Default::default()),
            RrType::SSHFP => Self::SSHFP(Default::default()),
            RrType::TLSA => Self::TLSA(Default::default()),
            RrType::URI => Self::URI(Default::default()),
        }
    }

    /// Builds a new record of type `rr_type` from validated fields.
    /// Fields that were not provided keep their default values.
    pub fn create(rr_type: RrType, fields: &ValidFields) -> Self {
        let mut record = Self::empty(rr_type);
        record.merge(fields);
        record
    }

    /// Returns the RR type of the record.
    pub fn rr_type(&self) -> RrType {
        dispatch!(self, data => type_of(data))
    }

    /// Overwrites exactly the fields that `fields` marks as valid.
    /// `fields` must have been validated against this record's schema.
    pub fn merge(&mut self, fields: &ValidFields) {
        dispatch!(self, data => data.merge(fields))
    }

    /// Produces the stored encoding of the record. The type is not
    /// part of the encoding; it is carried by the storage key.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        dispatch!(self, data => data.write(&mut writer))?;
        Ok(writer.finish())
    }

    /// Reads a record of type `rr_type` from its stored encoding.
    pub fn decode(rr_type: RrType, octets: &[u8]) -> Result<Self, DecodeError> {
        match rr_type {
            RrType::A => decode_as(octets).map(Self::A),
            RrType::AAAA => decode_as(octets).map(Self::AAAA),
            RrType::CNAME => decode_as(octets).map(Self::CNAME),
            RrType::MX => decode_as(octets).map(Self::MX),
            RrType::LOC => decode_as(octets).map(Self::LOC),
            RrType::SRV => decode_as(octets).map(Self::SRV),
            RrType::SPF => decode_as(octets).map(Self::SPF),
            RrType::TXT => decode_as(octets).map(Self::TXT),
            RrType::NS => decode_as(octets).map(Self::NS),
            RrType::CAA => decode_as(octets).map(Self::CAA),
            RrType::PTR => decode_as(octets).map(Self::PTR),
            RrType::CERT => decode_as(octets).map(Self::CERT),
            RrType::DNSKEY => decode_as(octets).map(Self::DNSKEY),
            RrType::DS => decode_as(octets).map(Self::DS),
            RrType::NAPTR => decode_as(octets).map(Self::NAPTR),
            RrType::SMIMEA => decode_as(octets).map(Self::SMIMEA),
            RrType::SSHFP => decode_as(octets).map(Self::SSHFP),
            RrType::TLSA => decode_as(octets).map(Self::TLSA),
            RrType::URI => decode_as(octets).map(Self::URI),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
