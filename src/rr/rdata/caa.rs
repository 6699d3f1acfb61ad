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

//! Record data for the [RFC 8659] RR type, CAA.
//!
//! [RFC 8659]: https://datatracker.ietf.org/doc/html/rfc8659

use serde::Serialize;

use super::helpers::set_string;
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Caa {
    pub tag: String,
    pub content: String,
}

impl RecordData for Caa {
    const TYPE: RrType = RrType::CAA;

    fn merge(&mut self, fields: &ValidFields) {
        set_string(&mut self.tag, fields.string("tag"));
        set_string(&mut self.content, fields.string("content"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.string("tag", &self.tag)?;
        writer.string("content", &self.content)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            tag: reader.string()?,
            content: reader.string()?,
        })
    }
}
