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

//! Record data for the DNSSEC RR types of [RFC 4034], DNSKEY and DS.
//!
//! Key material is stored in the text form it arrived in: Base64 for
//! public keys and hexadecimal for digests.
//!
//! [RFC 4034]: https://datatracker.ietf.org/doc/html/rfc4034

use serde::Serialize;

use super::helpers::{set, set_string};
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

////////////////////////////////////////////////////////////////////////
// RFC 4034 § 2 - DNSKEY RR                                           //
////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Dnskey {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: String,
}

impl RecordData for Dnskey {
    const TYPE: RrType = RrType::DNSKEY;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.flags, fields.u16("flags"));
        set(&mut self.protocol, fields.u8("protocol"));
        set(&mut self.algorithm, fields.u8("algorithm"));
        set_string(&mut self.public_key, fields.string("public-key"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.u16(self.flags);
        writer.u8(self.protocol);
        writer.u8(self.algorithm);
        writer.string("public-key", &self.public_key)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            flags: reader.u16()?,
            protocol: reader.u8()?,
            algorithm: reader.u8()?,
            public_key: reader.string()?,
        })
    }
}

////////////////////////////////////////////////////////////////////////
// RFC 4034 § 5 - DS RR                                               //
////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Ds {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: String,
}

impl RecordData for Ds {
    const TYPE: RrType = RrType::DS;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.key_tag, fields.u16("key-tag"));
        set(&mut self.algorithm, fields.u8("algorithm"));
        set(&mut self.digest_type, fields.u8("digest-type"));
        set_string(&mut self.digest, fields.string("digest"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.u16(self.key_tag);
        writer.u8(self.algorithm);
        writer.u8(self.digest_type);
        writer.string("digest", &self.digest)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            key_tag: reader.u16()?,
            algorithm: reader.u8()?,
            digest_type: reader.u8()?,
            digest: reader.string()?,
        })
    }
}
