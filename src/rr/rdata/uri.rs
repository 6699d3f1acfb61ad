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

//! Record data for the [RFC 7553] RR type, URI.
//!
//! [RFC 7553]: https://datatracker.ietf.org/doc/html/rfc7553

use serde::Serialize;

use super::helpers::{set, set_string};
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Uri {
    pub priority: u16,
    pub weight: u16,
    pub target: String,
}

impl RecordData for Uri {
    const TYPE: RrType = RrType::URI;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.priority, fields.u16("priority"));
        set(&mut self.weight, fields.u16("weight"));
        set_string(&mut self.target, fields.string("target"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.u16(self.priority);
        writer.u16(self.weight);
        writer.string("target", &self.target)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            priority: reader.u16()?,
            weight: reader.u16()?,
            target: reader.string()?,
        })
    }
}
