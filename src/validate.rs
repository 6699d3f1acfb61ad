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

//! Checking of JSON request bodies against a [`Schema`].
//!
//! [`validate`] turns a loosely typed JSON object into [`ValidFields`]:
//! a typed value for each schema field that was present and valid. The
//! set of fields in a [`ValidFields`] is the request's validity map;
//! only those fields are merged into stored records. Validation fails
//! fast: the first missing required field or ill-typed value aborts it
//! with a [`ValidationError`] naming the field.
//!
//! Fields that the schema does not list are ignored, so that clients may
//! send bodies with extra members (including the `type` discriminator
//! itself). A member whose value is JSON `null` is treated as absent.
//!
//! Integer fields accept only JSON numbers written as non-negative
//! integers. A whole number written with a fraction or exponent, such
//! as `10.0` or `1e1`, is rejected like any other non-integer.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};

use crate::schema::{FieldSpec, FieldType, Requirement, Schema};
use crate::util::is_hex_octets;

////////////////////////////////////////////////////////////////////////
// VALIDATION                                                         //
////////////////////////////////////////////////////////////////////////

/// Whether a body creates a new resource or updates an existing one.
/// This decides which fields are required; see
/// [`Requirement`](crate::schema::Requirement).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Create,
    Update,
}

impl Mode {
    fn requires(self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::Always => true,
            Requirement::OnCreate => self == Self::Create,
        }
    }
}

/// Checks `body` against `schema`, visiting fields in schema order.
pub fn validate(
    schema: &'static Schema,
    body: &Map<String, Value>,
    mode: Mode,
) -> Result<ValidFields, ValidationError> {
    let mut values = BTreeMap::new();
    for spec in schema.fields {
        match body.get(spec.name) {
            None | Some(Value::Null) => {
                if mode.requires(spec.requirement) {
                    return Err(ValidationError::Missing(spec.name));
                }
            }
            Some(value) => {
                values.insert(spec.name, check_field(spec, value)?);
            }
        }
    }
    Ok(ValidFields { schema, values })
}

/// Interprets a request body as a JSON object.
pub fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::NotAnObject)
}

/// Checks a single present field, producing its typed value.
fn check_field(spec: &FieldSpec, value: &Value) -> Result<FieldValue, ValidationError> {
    let wrong_type = || ValidationError::WrongType {
        field: spec.name,
        expected: spec.field_type,
    };

    match spec.field_type {
        FieldType::String => value
            .as_str()
            .map(|s| FieldValue::String(s.to_owned()))
            .ok_or_else(wrong_type),
        FieldType::Uint8 | FieldType::Uint16 | FieldType::Uint32 => {
            let max = spec.field_type.integer_max().unwrap_or_default();
            let number = value
                .as_u64()
                .filter(|n| *n <= max)
                .ok_or_else(wrong_type)?;
            if let Some((min, max)) = spec.bounds {
                if number < u64::from(min) || number > u64::from(max) {
                    return Err(ValidationError::OutOfRange {
                        field: spec.name,
                        min,
                        max,
                    });
                }
            }
            // The conversions cannot fail after the check above.
            Ok(match spec.field_type {
                FieldType::Uint8 => FieldValue::Uint8(number as u8),
                FieldType::Uint16 => FieldValue::Uint16(number as u16),
                _ => FieldValue::Uint32(number as u32),
            })
        }
        FieldType::Ipv4 => value
            .as_str()
            .and_then(|s| s.parse::<Ipv4Addr>().ok())
            .map(FieldValue::Ipv4)
            .ok_or_else(wrong_type),
        FieldType::Ipv6 => value
            .as_str()
            .and_then(|s| s.parse::<Ipv6Addr>().ok())
            .map(FieldValue::Ipv6)
            .ok_or_else(wrong_type),
        FieldType::StringList => value
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
            })
            .map(FieldValue::List)
            .ok_or_else(wrong_type),
        FieldType::OneOf(choices) => value
            .as_str()
            .filter(|s| choices.contains(s))
            .map(|s| FieldValue::String(s.to_owned()))
            .ok_or_else(wrong_type),
        FieldType::Base64 => value
            .as_str()
            .filter(|s| !s.is_empty() && BASE64.decode(s).is_ok())
            .map(|s| FieldValue::String(s.to_owned()))
            .ok_or_else(wrong_type),
        FieldType::Hex => value
            .as_str()
            .filter(|s| is_hex_octets(s))
            .map(|s| FieldValue::String(s.to_owned()))
            .ok_or_else(wrong_type),
    }
}

////////////////////////////////////////////////////////////////////////
// VALIDATED FIELDS                                                   //
////////////////////////////////////////////////////////////////////////

/// A typed field value that passed validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    /// Strings, including enumerated, Base64, and hexadecimal ones.
    String(String),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    List(Vec<String>),
}

/// The fields of a request body that were present and valid.
///
/// The typed accessors return [`None`] both for fields that were not
/// provided and for fields whose schema type differs from the one
/// asked for; since records read fields with the type their schema
/// declares, the latter never happens in practice.
#[derive(Clone, Debug)]
pub struct ValidFields {
    schema: &'static Schema,
    values: BTreeMap<&'static str, FieldValue>,
}

impl ValidFields {
    /// Returns whether `field` was provided and valid.
    pub fn is_valid(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Returns the validity map: every schema field, in schema order,
    /// with whether it was provided and valid.
    pub fn validity(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.schema
            .fields
            .iter()
            .map(|spec| (spec.name, self.is_valid(spec.name)))
    }

    pub fn string(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(FieldValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn u8(&self, field: &str) -> Option<u8> {
        match self.values.get(field) {
            Some(FieldValue::Uint8(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn u16(&self, field: &str) -> Option<u16> {
        match self.values.get(field) {
            Some(FieldValue::Uint16(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn u32(&self, field: &str) -> Option<u32> {
        match self.values.get(field) {
            Some(FieldValue::Uint32(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn ipv4(&self, field: &str) -> Option<Ipv4Addr> {
        match self.values.get(field) {
            Some(FieldValue::Ipv4(address)) => Some(*address),
            _ => None,
        }
    }

    pub fn ipv6(&self, field: &str) -> Option<Ipv6Addr> {
        match self.values.get(field) {
            Some(FieldValue::Ipv6(address)) => Some(*address),
            _ => None,
        }
    }

    pub fn list(&self, field: &str) -> Option<&[String]> {
        match self.values.get(field) {
            Some(FieldValue::List(items)) => Some(items),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a request body does not satisfy its schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationError {
    NotAnObject,
    Missing(&'static str),
    WrongType {
        field: &'static str,
        expected: FieldType,
    },
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::NotAnObject => f.write_str("body must be a JSON object"),
            Self::Missing(field) => write!(f, "field '{}' is required", field),
            Self::WrongType { field, expected } => {
                write!(f, "field '{}' must be {}", field, expected)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "field '{}' must be between {} and {}", field, min, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::rr::RrType;
    use crate::schema::lookup;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn loc_body(lat_degrees: u64) -> Map<String, Value> {
        object(json!({
            "type": "LOC",
            "version": 0,
            "size": 1,
            "horizontal-precision": 22,
            "vertical-precision": 19,
            "altitude": 10_000_000,
            "lat-degrees": lat_degrees,
            "lat-minutes": 22,
            "lat-seconds": 23,
            "lat-direction": "N",
            "long-degrees": 4,
            "long-minutes": 53,
            "long-seconds": 32,
            "long-direction": "E",
        }))
    }

    #[test]
    fn loc_latitude_bounds_are_enforced() {
        let schema = lookup(RrType::LOC);
        assert!(validate(schema, &loc_body(90), Mode::Update).is_ok());
        assert_eq!(
            validate(schema, &loc_body(91), Mode::Update).unwrap_err(),
            ValidationError::OutOfRange {
                field: "lat-degrees",
                min: 0,
                max: 90,
            },
        );
    }

    #[test]
    fn loc_fields_are_required_even_on_update() {
        let mut body = loc_body(52);
        body.remove("altitude");
        assert_eq!(
            validate(lookup(RrType::LOC), &body, Mode::Update).unwrap_err(),
            ValidationError::Missing("altitude"),
        );
    }

    #[test]
    fn directions_must_be_in_their_set() {
        let mut body = loc_body(52);
        body.insert("lat-direction".into(), json!("E"));
        assert!(matches!(
            validate(lookup(RrType::LOC), &body, Mode::Update),
            Err(ValidationError::WrongType {
                field: "lat-direction",
                ..
            }),
        ));
    }

    #[test]
    fn update_fields_are_optional_but_create_fields_are_not() {
        let schema = lookup(RrType::MX);
        let body = object(json!({ "type": "MX", "priority": 10 }));

        let fields = validate(schema, &body, Mode::Update).unwrap();
        assert!(fields.is_valid("priority"));
        assert!(!fields.is_valid("host"));
        assert_eq!(
            fields.validity().collect::<Vec<_>>(),
            vec![("host", false), ("priority", true)],
        );

        assert_eq!(
            validate(schema, &body, Mode::Create).unwrap_err(),
            ValidationError::Missing("host"),
        );
    }

    #[test]
    fn integers_must_fit_their_width() {
        let schema = lookup(RrType::MX);
        for bad in [json!(65536), json!(-1), json!(1.5), json!(10.0), json!("10")] {
            let body = object(json!({ "priority": bad }));
            assert_eq!(
                validate(schema, &body, Mode::Update).unwrap_err(),
                ValidationError::WrongType {
                    field: "priority",
                    expected: FieldType::Uint16,
                },
            );
        }
        let body = object(json!({ "priority": 65535 }));
        let fields = validate(schema, &body, Mode::Update).unwrap();
        assert_eq!(fields.u16("priority"), Some(65535));
    }

    #[test]
    fn addresses_are_parsed_by_family() {
        let a = validate(
            lookup(RrType::A),
            &object(json!({ "host": "10.0.0.5" })),
            Mode::Update,
        )
        .unwrap();
        assert_eq!(a.ipv4("host"), Some(Ipv4Addr::new(10, 0, 0, 5)));

        assert!(matches!(
            validate(
                lookup(RrType::A),
                &object(json!({ "host": "2001:db8::1" })),
                Mode::Update,
            ),
            Err(ValidationError::WrongType { field: "host", .. }),
        ));
        assert!(validate(
            lookup(RrType::AAAA),
            &object(json!({ "host": "2001:db8::1" })),
            Mode::Update,
        )
        .is_ok());
    }

    #[test]
    fn string_lists_must_contain_only_strings() {
        let schema = lookup(RrType::TXT);
        let fields = validate(
            schema,
            &object(json!({ "text": ["v=spf1", "-all"] })),
            Mode::Update,
        )
        .unwrap();
        assert_eq!(fields.list("text").unwrap(), ["v=spf1", "-all"]);
        assert!(validate(schema, &object(json!({ "text": ["a", 1] })), Mode::Update).is_err());
        assert!(validate(schema, &object(json!({ "text": "a" })), Mode::Update).is_err());
    }

    #[test]
    fn key_material_encodings_are_checked() {
        let dnskey = lookup(RrType::DNSKEY);
        assert!(validate(
            dnskey,
            &object(json!({ "public-key": "AwEAAaz/tAm8yTn4Mfeh" })),
            Mode::Update,
        )
        .is_ok());
        assert!(validate(
            dnskey,
            &object(json!({ "public-key": "not base64!" })),
            Mode::Update,
        )
        .is_err());

        let ds = lookup(RrType::DS);
        assert!(validate(ds, &object(json!({ "digest": "2BB183AF5F22" })), Mode::Update).is_ok());
        assert!(validate(ds, &object(json!({ "digest": "2BB18" })), Mode::Update).is_err());
    }

    #[test]
    fn unknown_and_null_fields_are_ignored() {
        let fields = validate(
            lookup(RrType::SRV),
            &object(json!({ "type": "SRV", "port": null, "ttl": 300, "weight": 5 })),
            Mode::Update,
        )
        .unwrap();
        assert!(!fields.is_valid("port"));
        assert!(!fields.is_valid("ttl"));
        assert_eq!(fields.u16("weight"), Some(5));
    }

    #[test]
    fn errors_name_the_field() {
        assert_eq!(
            ValidationError::Missing("host").to_string(),
            "field 'host' is required",
        );
        assert_eq!(
            ValidationError::WrongType {
                field: "lat-direction",
                expected: FieldType::OneOf(&["N", "S"]),
            }
            .to_string(),
            "field 'lat-direction' must be one of: N, S",
        );
    }
}
