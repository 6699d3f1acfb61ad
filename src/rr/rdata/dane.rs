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

//! Record data for the DANE certificate association RR types, TLSA
//! ([RFC 6698]) and SMIMEA ([RFC 8162]). The two share one layout.
//!
//! [RFC 6698]: https://datatracker.ietf.org/doc/html/rfc6698
//! [RFC 8162]: https://datatracker.ietf.org/doc/html/rfc8162

use serde::Serialize;

use super::helpers::{set, set_string};
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

/// Defines a certificate association data structure for an RR type.
macro_rules! certificate_association {
    ($name:ident, $rr_type:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
        #[serde(rename_all = "kebab-case")]
        pub struct $name {
            pub usage: u8,
            pub selector: u8,
            pub matching_type: u8,
            /// The certificate association data, in hexadecimal.
            pub certificate: String,
        }

        impl RecordData for $name {
            const TYPE: RrType = $rr_type;

            fn merge(&mut self, fields: &ValidFields) {
                set(&mut self.usage, fields.u8("usage"));
                set(&mut self.selector, fields.u8("selector"));
                set(&mut self.matching_type, fields.u8("matching-type"));
                set_string(&mut self.certificate, fields.string("certificate"));
            }

            fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
                writer.u8(self.usage);
                writer.u8(self.selector);
                writer.u8(self.matching_type);
                writer.string("certificate", &self.certificate)
            }

            fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
                Ok(Self {
                    usage: reader.u8()?,
                    selector: reader.u8()?,
                    matching_type: reader.u8()?,
                    certificate: reader.string()?,
                })
            }
        }
    };
}

certificate_association!(Tlsa, RrType::TLSA, "TLSA data.");
certificate_association!(Smimea, RrType::SMIMEA, "SMIMEA data.");
