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

//! Record data for the [RFC 3403] RR type, NAPTR.
//!
//! [RFC 3403]: https://datatracker.ietf.org/doc/html/rfc3403

use serde::Serialize;

use super::helpers::{set, set_string};
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Naptr {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regexp: String,
    pub replacement: String,
}

impl RecordData for Naptr {
    const TYPE: RrType = RrType::NAPTR;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.order, fields.u16("order"));
        set(&mut self.preference, fields.u16("preference"));
        set_string(&mut self.flags, fields.string("flags"));
        set_string(&mut self.service, fields.string("service"));
        set_string(&mut self.regexp, fields.string("regexp"));
        set_string(&mut self.replacement, fields.string("replacement"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.u16(self.order);
        writer.u16(self.preference);
        writer.string("flags", &self.flags)?;
        writer.string("service", &self.service)?;
        writer.string("regexp", &self.regexp)?;
        writer.string("replacement", &self.replacement)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            order: reader.u16()?,
            preference: reader.u16()?,
            flags: reader.string()?,
            service: reader.string()?,
            regexp: reader.string()?,
            replacement: reader.string()?,
        })
    }
}
