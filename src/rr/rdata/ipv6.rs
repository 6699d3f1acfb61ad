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

//! Record data for the [RFC 3596] RR type, AAAA.
//!
//! [RFC 3596]: https://datatracker.ietf.org/doc/html/rfc3596

use std::net::Ipv6Addr;

use serde::Serialize;

use super::helpers::set;
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

////////////////////////////////////////////////////////////////////////
// RFC 3596 § 2 - AAAA RR                                             //
////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Aaaa {
    pub host: Ipv6Addr,
}

impl Default for Aaaa {
    fn default() -> Self {
        Self {
            host: Ipv6Addr::UNSPECIFIED,
        }
    }
}

impl RecordData for Aaaa {
    const TYPE: RrType = RrType::AAAA;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.host, fields.ipv6("host"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.ipv6(self.host);
        Ok(())
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            host: reader.ipv6()?,
        })
    }
}
