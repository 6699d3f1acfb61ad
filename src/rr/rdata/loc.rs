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

//! Record data for the [RFC 1876] RR type, LOC.
//!
//! Coordinates are kept in the sexagesimal form that clients submit
//! (degrees, minutes, seconds, and a hemisphere), not in RFC 1876's
//! thousandths of an arc second. The RFC form cannot tell 0° N from
//! 0° S, and it folds a minutes value of 60 into the degrees, so
//! converting to it would not give clients back what they stored.
//!
//! [RFC 1876]: https://datatracker.ietf.org/doc/html/rfc1876

use serde::Serialize;

use super::helpers::set;
use super::RecordData;
use crate::rr::RrType;
use crate::validate::ValidFields;
use crate::wire::{DecodeError, EncodeError, Reader, Writer};

////////////////////////////////////////////////////////////////////////
// HEMISPHERES                                                        //
////////////////////////////////////////////////////////////////////////

/// The hemisphere of a latitude.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum LatDirection {
    #[default]
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl LatDirection {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "N" => Some(Self::North),
            "S" => Some(Self::South),
            _ => None,
        }
    }

    fn letter(self) -> u8 {
        match self {
            Self::North => b'N',
            Self::South => b'S',
        }
    }

    fn from_octet(octet: u8) -> Result<Self, DecodeError> {
        match octet {
            b'N' => Ok(Self::North),
            b'S' => Ok(Self::South),
            _ => Err(DecodeError::InvalidValue("lat-direction")),
        }
    }
}

/// The hemisphere of a longitude.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum LongDirection {
    #[default]
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl LongDirection {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "E" => Some(Self::East),
            "W" => Some(Self::West),
            _ => None,
        }
    }

    fn letter(self) -> u8 {
        match self {
            Self::East => b'E',
            Self::West => b'W',
        }
    }

    fn from_octet(octet: u8) -> Result<Self, DecodeError> {
        match octet {
            b'E' => Ok(Self::East),
            b'W' => Ok(Self::West),
            _ => Err(DecodeError::InvalidValue("long-direction")),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// RFC 1876 - LOC RR                                                  //
////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Loc {
    pub version: u8,
    pub size: u8,
    pub horizontal_precision: u8,
    pub vertical_precision: u8,
    pub altitude: u32,
    pub lat_degrees: u8,
    pub lat_minutes: u8,
    pub lat_seconds: u8,
    pub lat_direction: LatDirection,
    pub long_degrees: u8,
    pub long_minutes: u8,
    pub long_seconds: u8,
    pub long_direction: LongDirection,
}

impl RecordData for Loc {
    const TYPE: RrType = RrType::LOC;

    fn merge(&mut self, fields: &ValidFields) {
        set(&mut self.version, fields.u8("version"));
        set(&mut self.size, fields.u8("size"));
        set(
            &mut self.horizontal_precision,
            fields.u8("horizontal-precision"),
        );
        set(&mut self.vertical_precision, fields.u8("vertical-precision"));
        set(&mut self.altitude, fields.u32("altitude"));
        set(&mut self.lat_degrees, fields.u8("lat-degrees"));
        set(&mut self.lat_minutes, fields.u8("lat-minutes"));
        set(&mut self.lat_seconds, fields.u8("lat-seconds"));
        set(
            &mut self.lat_direction,
            fields
                .string("lat-direction")
                .and_then(LatDirection::from_letter),
        );
        set(&mut self.long_degrees, fields.u8("long-degrees"));
        set(&mut self.long_minutes, fields.u8("long-minutes"));
        set(&mut self.long_seconds, fields.u8("long-seconds"));
        set(
            &mut self.long_direction,
            fields
                .string("long-direction")
                .and_then(LongDirection::from_letter),
        );
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.u8(self.version);
        writer.u8(self.size);
        writer.u8(self.horizontal_precision);
        writer.u8(self.vertical_precision);
        writer.u32(self.altitude);
        writer.u8(self.lat_degrees);
        writer.u8(self.lat_minutes);
        writer.u8(self.lat_seconds);
        writer.u8(self.lat_direction.letter());
        writer.u8(self.long_degrees);
        writer.u8(self.long_minutes);
        writer.u8(self.long_seconds);
        writer.u8(self.long_direction.letter());
        Ok(())
    }

    fn read(reader: &mut Reader) -> Result<Self, DecodeError> {
        Ok(Self {
            version: reader.u8()?,
            size: reader.u8()?,
            horizontal_precision: reader.u8()?,
            vertical_precision: reader.u8()?,
            altitude: reader.u32()?,
            lat_degrees: reader.u8()?,
            lat_minutes: reader.u8()?,
            lat_seconds: reader.u8()?,
            lat_direction: LatDirection::from_octet(reader.u8()?)?,
            long_degrees: reader.u8()?,
            long_minutes: reader.u8()?,
            long_seconds: reader.u8()?,
            long_direction: LongDirection::from_octet(reader.u8()?)?,
        })
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn southern_equator_survives_storage() {
        let loc = Loc {
            lat_direction: LatDirection::South,
            long_direction: LongDirection::West,
            lat_minutes: 60,
            ..Default::default()
        };
        let mut writer = Writer::new();
        loc.write(&mut writer).unwrap();
        let octets = writer.finish();
        let mut reader = Reader::new(&octets);
        assert_eq!(Loc::read(&mut reader).unwrap(), loc);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn bad_hemisphere_octets_are_rejected() {
        assert_eq!(
            LatDirection::from_octet(b'E'),
            Err(DecodeError::InvalidValue("lat-direction")),
        );
        assert_eq!(
            LongDirection::from_octet(b'N'),
            Err(DecodeError::InvalidValue("long-direction")),
        );
    }
}
