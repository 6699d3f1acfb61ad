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

//! Record data for the [RFC 4408] RR type, SPF. Its data has the same
//! shape as TXT data.
//!
//! [RFC 4408]: https://datatracker.ietf.org/doc/html/rfc4408

use serde::Serialize;

use super::helpers::set_text;
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Spf {
    pub text: String,
}

impl RecordData for Spf {
    const TYPE: RrType = RrType::SPF;

    fn merge(&mut self, fields: &ValidFields) {
        set_text(&mut self.text, fields.list("text"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.string("text", &self.text)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            text: reader.string()?,
        })
    }
}
