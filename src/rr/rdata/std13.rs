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

//! Record data for the RR types from the original DNS specification,
//! STD 13 ([RFC 1034] and [RFC 1035]).
//!
//! [RFC 1034]: https://datatracker.ietf.org/doc/html/rfc1034
//! [RFC 1035]: https://datatracker.ietf.org/doc/html/rfc1035

use std::net::Ipv4Addr;

use serde::Serialize;

use super::helpers::{set, set_string, set_text};
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

////////////////////////////////////////////////////////////////////////
// RFC 1035 § 3.4.1 - A RR                                            //
////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct A {
    pub host: Ipv4Addr,
}

impl Default for A {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED,
        }
    }
}

impl RecordData for A {
    const TYPE: RrType = RrType::A;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.host, fields.ipv4("host"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.ipv4(self.host);
        Ok(())
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            host: reader.ipv4()?,
        })
    }
}

////////////////////////////////////////////////////////////////////////
// RFC 1035 § 3.3.1, 3.3.11, AND 3.3.12 - CNAME, NS, AND PTR RRs      //
////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Cname {
    pub target: String,
}

impl RecordData for Cname {
    const TYPE: RrType = RrType::CNAME;

    fn merge(&mut self, fields: &ValidFields) {
        set_string(&mut self.target, fields.string("target"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.string("target", &self.target)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            target: reader.string()?,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Ns {
    pub nameserver: String,
}

impl RecordData for Ns {
    const TYPE: RrType = RrType::NS;

    fn merge(&mut self, fields: &ValidFields) {
        set_string(&mut self.nameserver, fields.string("nameserver"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.string("nameserver", &self.nameserver)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            nameserver: reader.string()?,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Ptr {
    pub domain: String,
}

impl RecordData for Ptr {
    const TYPE: RrType = RrType::PTR;

    fn merge(&mut self, fields: &ValidFields) {
        set_string(&mut self.domain, fields.string("domain"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.string("domain", &self.domain)
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            domain: reader.string()?,
        })
    }
}

////////////////////////////////////////////////////////////////////////
// RFC 1035 § 3.3.9 - MX RR                                           //
////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Mx {
    pub host: String,
    pub priority: u16,
}

impl RecordData for Mx {
    const TYPE: RrType = RrType::MX;

    fn merge(&mut self, fields: &ValidFields) {
        set_string(&mut self.host, fields.string("host"));
        set(&mut self.priority, fields.u16("priority"));
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.string("host", &self.host)?;
        writer.u16(self.priority);
        Ok(())
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            host: reader.string()?,
            priority: reader.u16()?,
        })
    }
}

////////////////////////////////////////////////////////////////////////
// RFC 1035 § 3.3.14 - TXT RR                                         //
////////////////////////////////////////////////////////////////////////

/// TXT data. The strings of a request are stored joined by single
/// spaces, and are returned that way.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Txt {
    pub text: String,
}

impl RecordData for Txt {
    const TYPE: RrType = RrType::TXT;

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
