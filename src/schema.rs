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

//! The static catalogue of request-body schemas.
//!
//! Every managed RR type has a [`Schema`] listing the fields a request
//! body may carry for it: the field's name, its semantic
//! [`FieldType`], when it is required, and (for numeric fields)
//! optional inclusive bounds. The [`validate`](crate::validate) module
//! checks bodies against these schemas, and the typed record structures
//! in [`rr::rdata`](crate::rr::rdata) read exactly these fields back
//! out. The two must agree field for field.

use std::fmt;

use crate::rr::{RrType, UnknownTypeError};

////////////////////////////////////////////////////////////////////////
// SCHEMA STRUCTURES                                                  //
////////////////////////////////////////////////////////////////////////

/// The schema of a request body.
#[derive(Debug)]
pub struct Schema {
    /// What the body describes (an RR type mnemonic, or e.g. "role").
    pub subject: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Returns the specification of the field called `name`, if the
    /// schema has one.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

/// The specification of a single field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub requirement: Requirement,
    pub bounds: Option<(u32, u32)>,
}

impl FieldSpec {
    /// A field that must be present in every body.
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            requirement: Requirement::Always,
            bounds: None,
        }
    }

    /// A field that must be present when a record is created, but that
    /// an update may omit to keep the stored value.
    pub const fn on_create(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            requirement: Requirement::OnCreate,
            bounds: None,
        }
    }

    /// Adds inclusive bounds to a numeric field.
    pub const fn bounded(self, min: u32, max: u32) -> Self {
        Self {
            bounds: Some((min, max)),
            ..self
        }
    }
}

/// When a field must be present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Requirement {
    Always,
    OnCreate,
}

/// The semantic type of a field's JSON value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    String,
    Uint8,
    Uint16,
    Uint32,
    Ipv4,
    Ipv6,
    /// An array of strings.
    StringList,
    /// A string drawn from a fixed set (compared case-sensitively).
    OneOf(&'static [&'static str]),
    /// A string of standard Base64 ([RFC 4648 § 4]), with padding.
    ///
    /// [RFC 4648 § 4]: https://datatracker.ietf.org/doc/html/rfc4648#section-4
    Base64,
    /// A string of hexadecimal digits encoding whole octets.
    Hex,
}

impl FieldType {
    /// Returns the largest value of an unsigned integer type, or
    /// [`None`] for non-integer types.
    pub fn integer_max(self) -> Option<u64> {
        match self {
            Self::Uint8 => Some(u8::MAX.into()),
            Self::Uint16 => Some(u16::MAX.into()),
            Self::Uint32 => Some(u32::MAX.into()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::String => f.write_str("a string"),
            Self::Uint8 => f.write_str("an unsigned 8-bit integer"),
            Self::Uint16 => f.write_str("an unsigned 16-bit integer"),
            Self::Uint32 => f.write_str("an unsigned 32-bit integer"),
            Self::Ipv4 => f.write_str("an IPv4 address"),
            Self::Ipv6 => f.write_str("an IPv6 address"),
            Self::StringList => f.write_str("an array of strings"),
            Self::OneOf(choices) => write!(f, "one of: {}", choices.join(", ")),
            Self::Base64 => f.write_str("a Base64 string"),
            Self::Hex => f.write_str("a hexadecimal string"),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// REGISTRY                                                           //
////////////////////////////////////////////////////////////////////////

/// Returns the schema for `rr_type`.
pub fn lookup(rr_type: RrType) -> &'static Schema {
    match rr_type {
        RrType::A => &A,
        RrType::AAAA => &AAAA,
        RrType::CNAME => &CNAME,
        RrType::MX => &MX,
        RrType::LOC => &LOC,
        RrType::SRV => &SRV,
        RrType::SPF => &SPF,
        RrType::TXT => &TXT,
        RrType::NS => &NS,
        RrType::CAA => &CAA,
        RrType::PTR => &PTR,
        RrType::CERT => &CERT,
        RrType::DNSKEY => &DNSKEY,
        RrType::DS => &DS,
        RrType::NAPTR => &NAPTR,
        RrType::SMIMEA => &SMIMEA,
        RrType::SSHFP => &SSHFP,
        RrType::TLSA => &TLSA,
        RrType::URI => &URI,
    }
}

/// Returns the schema for a textual type tag, which is matched
/// case-insensitively.
pub fn for_tag(tag: &str) -> Result<&'static Schema, UnknownTypeError> {
    tag.parse().map(lookup)
}

/// The schema of role bodies. The patterns are further checked by
/// [`policy::Pattern`](crate::policy::Pattern).
pub static ROLE: Schema = Schema {
    subject: "role",
    fields: &[
        FieldSpec::required("description", FieldType::String),
        FieldSpec::required("allow", FieldType::String),
        FieldSpec::required("deny", FieldType::String),
    ],
};

static A: Schema = Schema {
    subject: "A",
    fields: &[FieldSpec::on_create("host", FieldType::Ipv4)],
};

static AAAA: Schema = Schema {
    subject: "AAAA",
    fields: &[FieldSpec::on_create("host", FieldType::Ipv6)],
};

static CNAME: Schema = Schema {
    subject: "CNAME",
    fields: &[FieldSpec::on_create("target", FieldType::String)],
};

static MX: Schema = Schema {
    subject: "MX",
    fields: &[
        FieldSpec::on_create("host", FieldType::String),
        FieldSpec::on_create("priority", FieldType::Uint16),
    ],
};

// RFC 1876 LOC data as sexagesimal coordinates. Unlike the other types,
// every field is needed on update too.
static LOC: Schema = Schema {
    subject: "LOC",
    fields: &[
        FieldSpec::required("version", FieldType::Uint8),
        FieldSpec::required("size", FieldType::Uint8),
        FieldSpec::required("horizontal-precision", FieldType::Uint8),
        FieldSpec::required("vertical-precision", FieldType::Uint8),
        FieldSpec::required("altitude", FieldType::Uint32),
        FieldSpec::required("lat-degrees", FieldType::Uint8).bounded(0, 90),
        FieldSpec::required("lat-minutes", FieldType::Uint8).bounded(0, 60),
        FieldSpec::required("lat-seconds", FieldType::Uint8).bounded(0, 60),
        FieldSpec::required("lat-direction", FieldType::OneOf(&["N", "S"])),
        FieldSpec::required("long-degrees", FieldType::Uint8).bounded(0, 180),
        FieldSpec::required("long-minutes", FieldType::Uint8).bounded(0, 60),
        FieldSpec::required("long-seconds", FieldType::Uint8).bounded(0, 60),
        FieldSpec::required("long-direction", FieldType::OneOf(&["E", "W"])),
    ],
};

static SRV: Schema = Schema {
    subject: "SRV",
    fields: &[
        FieldSpec::on_create("priority", FieldType::Uint16),
        FieldSpec::on_create("weight", FieldType::Uint16),
        FieldSpec::on_create("port", FieldType::Uint16),
        FieldSpec::on_create("target", FieldType::String),
    ],
};

static SPF: Schema = Schema {
    subject: "SPF",
    fields: &[FieldSpec::on_create("text", FieldType::StringList)],
};

static TXT: Schema = Schema {
    subject: "TXT",
    fields: &[FieldSpec::on_create("text", FieldType::StringList)],
};

static NS: Schema = Schema {
    subject: "NS",
    fields: &[FieldSpec::on_create("nameserver", FieldType::String)],
};

static CAA: Schema = Schema {
    subject: "CAA",
    fields: &[
        FieldSpec::on_create("tag", FieldType::String),
        FieldSpec::on_create("content", FieldType::String),
    ],
};

static PTR: Schema = Schema {
    subject: "PTR",
    fields: &[FieldSpec::on_create("domain", FieldType::String)],
};

static CERT: Schema = Schema {
    subject: "CERT",
    fields: &[
        FieldSpec::on_create("c-type", FieldType::Uint16),
        FieldSpec::on_create("key-tag", FieldType::Uint16),
        FieldSpec::on_create("algorithm", FieldType::Uint8),
        FieldSpec::on_create("certificate", FieldType::Base64),
    ],
};

static DNSKEY: Schema = Schema {
    subject: "DNSKEY",
    fields: &[
        FieldSpec::on_create("flags", FieldType::Uint16),
        FieldSpec::on_create("protocol", FieldType::Uint8),
        FieldSpec::on_create("algorithm", FieldType::Uint8),
        FieldSpec::on_create("public-key", FieldType::Base64),
    ],
};

static DS: Schema = Schema {
    subject: "DS",
    fields: &[
        FieldSpec::on_create("key-tag", FieldType::Uint16),
        FieldSpec::on_create("algorithm", FieldType::Uint8),
        FieldSpec::on_create("digest-type", FieldType::Uint8),
        FieldSpec::on_create("digest", FieldType::Hex),
    ],
};

static NAPTR: Schema = Schema {
    subject: "NAPTR",
    fields: &[
        FieldSpec::on_create("order", FieldType::Uint16),
        FieldSpec::on_create("preference", FieldType::Uint16),
        FieldSpec::on_create("flags", FieldType::String),
        FieldSpec::on_create("service", FieldType::String),
        FieldSpec::on_create("regexp", FieldType::String),
        FieldSpec::on_create("replacement", FieldType::String),
    ],
};

static SMIMEA: Schema = Schema {
    subject: "SMIMEA",
    fields: &[
        FieldSpec::on_create("usage", FieldType::Uint8),
        FieldSpec::on_create("selector", FieldType::Uint8),
        FieldSpec::on_create("matching-type", FieldType::Uint8),
        FieldSpec::on_create("certificate", FieldType::Hex),
    ],
};

static SSHFP: Schema = Schema {
    subject: "SSHFP",
    fields: &[
        FieldSpec::on_create("algorithm", FieldType::Uint8),
        FieldSpec::on_create("s-type", FieldType::Uint8),
        FieldSpec::on_create("fingerprint", FieldType::Hex),
    ],
};

static TLSA: Schema = Schema {
    subject: "TLSA",
    fields: &[
        FieldSpec::on_create("usage", FieldType::Uint8),
        FieldSpec::on_create("selector", FieldType::Uint8),
        FieldSpec::on_create("matching-type", FieldType::Uint8),
        FieldSpec::on_create("certificate", FieldType::Hex),
    ],
};

static URI: Schema = Schema {
    subject: "URI",
    fields: &[
        FieldSpec::on_create("priority", FieldType::Uint16),
        FieldSpec::on_create("weight", FieldType::Uint16),
        FieldSpec::on_create("target", FieldType::String),
    ],
};

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_matching_schema() {
        for rr_type in RrType::ALL {
            let schema = lookup(rr_type);
            assert_eq!(schema.subject, rr_type.as_str());
            assert!(!schema.fields.is_empty());
        }
    }

    #[test]
    fn field_names_are_unique_within_a_schema() {
        for rr_type in RrType::ALL {
            let fields = lookup(rr_type).fields;
            for (i, spec) in fields.iter().enumerate() {
                assert!(
                    fields[i + 1..].iter().all(|other| other.name != spec.name),
                    "{} lists '{}' twice",
                    rr_type,
                    spec.name,
                );
            }
        }
    }

    #[test]
    fn bounds_fit_their_integer_types() {
        for rr_type in RrType::ALL {
            for spec in lookup(rr_type).fields {
                if let Some((min, max)) = spec.bounds {
                    let type_max = spec.field_type.integer_max().unwrap();
                    assert!(min <= max && u64::from(max) <= type_max);
                }
            }
        }
    }

    #[test]
    fn loc_coordinates_are_bounded() {
        let loc = lookup(RrType::LOC);
        assert_eq!(loc.field("lat-degrees").unwrap().bounds, Some((0, 90)));
        assert_eq!(loc.field("long-degrees").unwrap().bounds, Some((0, 180)));
        assert!(loc
            .fields
            .iter()
            .all(|spec| spec.requirement == Requirement::Always));
    }

    #[test]
    fn tags_are_looked_up_case_insensitively() {
        assert_eq!(for_tag("mx").unwrap().subject, "MX");
        assert_eq!(for_tag("BOGUS").unwrap_err(), UnknownTypeError);
    }
}
