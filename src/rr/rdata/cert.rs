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

//! Record data for the [RFC 4398] RR type, CERT.
//!
//! [RFC 4398]: https://datatracker.ietf.org/doc/html/rfc4398

use serde::Serialize;

use super::helpers::{set, set_string};
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

/// CERT data. The certificate is kept in its Base64 text form.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cert {
    pub c_type: u16,
    pub key_tag: u16,
    pub algorithm: u8,
    pub certificate: String,
}

impl RecordData for Cert {
    const TYPE: RrType = RrType::CERT;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.c_type, fields.u16("c-type"));
        set(&mut self.key_tag, fields.u16("key-tag"));
        set(&mut self.algorithm, fields.u8("algorithm"));
        set_string(&mut self.certificate, fields.string("certificate"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.u16(self.c_type);
        writer.u16(self.key_tag);
        writer.u8(self.algorithm);
        writer.string("certificate", &self.certificate)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            c_type: reader.u16()?,
            key_tag: reader.u16()?,
            algorithm: reader.u8()?,
            certificate: reader.string()?,
        })
    }
}
