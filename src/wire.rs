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

//! The binary encoding of values kept in the store.
//!
//! Stored values are a plain concatenation of fields, in the order the
//! owning schema lists them:
//!
//! * unsigned integers are big-endian ("network order"), as in DNS
//!   messages;
//! * IPv4 and IPv6 addresses are their 4 and 16 raw octets;
//! * strings are a 16-bit length followed by that many octets of
//!   UTF-8.
//!
//! No tags or field names are written. The reader of a value must know
//! its shape, which it always does since values are keyed by RR type.
//! Decoding is strict: a value must be consumed exactly, so truncated
//! or over-long data is reported rather than silently accepted.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

////////////////////////////////////////////////////////////////////////
// WRITER                                                             //
////////////////////////////////////////////////////////////////////////

/// Builds an encoded value.
#[derive(Debug, Default)]
pub struct Writer {
    octets: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, value: u8) {
        self.octets.push(value);
    }

    pub fn u16(&mut self, value: u16) {
        self.octets.extend_from_slice(&value.to_be_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.octets.extend_from_slice(&value.to_be_bytes());
    }

    pub fn ipv4(&mut self, address: Ipv4Addr) {
        self.octets.extend_from_slice(&address.octets());
    }

    pub fn ipv6(&mut self, address: Ipv6Addr) {
        self.octets.extend_from_slice(&address.octets());
    }

    /// Writes a length-prefixed string. `field` names the value for
    /// error reporting; strings longer than 65,535 octets cannot be
    /// represented.
    pub fn string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError> {
        let len = u16::try_from(value.len()).map_err(|_| EncodeError {
            field,
            len: value.len(),
        })?;
        self.octets.reserve(2 + value.len());
        self.u16(len);
        self.octets.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Returns the encoded octets.
    pub fn finish(self) -> Vec<u8> {
        self.octets
    }
}

////////////////////////////////////////////////////////////////////////
// READER                                                             //
////////////////////////////////////////////////////////////////////////

/// Reads an encoded value front to back using a cursor.
#[derive(Debug, Eq, PartialEq)]
pub struct Reader<'a> {
    octets: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(octets: &'a [u8]) -> Self {
        Self { octets, cursor: 0 }
    }

    /// Takes the next `N` octets.
    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.cursor + N;
        let slice = self
            .octets
            .get(self.cursor..end)
            .ok_or(DecodeError::UnexpectedEnd)?;
        self.cursor = end;
        Ok(slice.try_into().unwrap())
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        self.take::<1>().map(|[octet]| octet)
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        self.take().map(u16::from_be_bytes)
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        self.take().map(u32::from_be_bytes)
    }

    pub fn ipv4(&mut self) -> Result<Ipv4Addr, DecodeError> {
        self.take::<4>().map(Ipv4Addr::from)
    }

    pub fn ipv6(&mut self) -> Result<Ipv6Addr, DecodeError> {
        self.take::<16>().map(Ipv6Addr::from)
    }

    pub fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u16()? as usize;
        let end = self.cursor + len;
        let octets = self
            .octets
            .get(self.cursor..end)
            .ok_or(DecodeError::UnexpectedEnd)?;
        let string = std::str::from_utf8(octets).map_err(|_| DecodeError::InvalidUtf8)?;
        self.cursor = end;
        Ok(string.to_owned())
    }

    /// Checks that the whole value was consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.cursor == self.octets.len() {
            Ok(())
        } else {
            Err(DecodeError::TrailingData)
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a value could not be encoded because a
/// string field was too long.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EncodeError {
    pub field: &'static str,
    pub len: usize,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "field '{}' is {} bytes long, but at most 65535 can be stored",
            self.field, self.len,
        )
    }
}

impl std::error::Error for EncodeError {}

/// An error signaling that a stored value is malformed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecodeError {
    UnexpectedEnd,
    TrailingData,
    InvalidUtf8,
    InvalidValue(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::UnexpectedEnd => f.write_str("unexpected end of stored value"),
            Self::TrailingData => f.write_str("extra data after stored value"),
            Self::InvalidUtf8 => f.write_str("stored string is not valid UTF-8"),
            Self::InvalidValue(field) => write!(f, "stored field '{}' is invalid", field),
        }
    }
}

impl std::error::Error for DecodeError {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut writer = Writer::new();
        writer.u8(1);
        writer.u16(0x0203);
        writer.u32(0x04050607);
        assert_eq!(writer.finish(), b"\x01\x02\x03\x04\x05\x06\x07");
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut writer = Writer::new();
        writer.string("text", "hi").unwrap();
        let octets = writer.finish();
        assert_eq!(octets, b"\x00\x02hi");

        let mut reader = Reader::new(&octets);
        assert_eq!(reader.string().unwrap(), "hi");
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn overlong_strings_are_refused() {
        let long = "x".repeat(u16::MAX as usize + 1);
        let mut writer = Writer::new();
        assert_eq!(
            writer.string("certificate", &long),
            Err(EncodeError {
                field: "certificate",
                len: long.len(),
            }),
        );
    }

    #[test]
    fn reader_detects_truncation_and_trailing_data() {
        let mut reader = Reader::new(b"\x00\x05abc");
        assert_eq!(reader.string(), Err(DecodeError::UnexpectedEnd));

        let mut reader = Reader::new(b"\x01\x02\x03");
        assert_eq!(reader.u16(), Ok(0x0102));
        assert_eq!(reader.finish(), Err(DecodeError::TrailingData));

        let mut reader = Reader::new(b"\x00\x01\xff");
        assert_eq!(reader.string(), Err(DecodeError::InvalidUtf8));
    }
}
