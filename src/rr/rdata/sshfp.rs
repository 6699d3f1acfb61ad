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

//! Record data for the [RFC 4255] RR type, SSHFP.
//!
//! [RFC 4255]: https://datatracker.ietf.org/doc/html/rfc4255

use serde::Serialize;

use super::helpers::{set, set_string};
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Sshfp {
    pub algorithm: u8,
    /// The fingerprint type.
    pub s_type: u8,
    pub fingerprint: String,
}

impl RecordData for Sshfp {
    const TYPE: RrType = RrType::SSHFP;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.algorithm, fields.u8("algorithm"));
        set(&mut self.s_type, fields.u8("s-type"));
        set_string(&mut self.fingerprint, fields.string("fingerprint"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.u8(self.algorithm);
        writer.u8(self.s_type);
        writer.string("fingerprint", &self.fingerprint)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            algorithm: reader.u8()?,
            s_type: reader.u8()?,
            fingerprint: reader.string()?,
        })
    }
}
