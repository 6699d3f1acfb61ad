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

//! Provides the [`RrType`] enumeration of managed RR types.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::util::Caseless;

////////////////////////////////////////////////////////////////////////
// RR TYPES                                                           //
////////////////////////////////////////////////////////////////////////

/// The RR types that can be managed.
///
/// Unlike a general-purpose DNS library, which must carry any 16-bit
/// type value, this is a closed set: every type listed here has a
/// schema (see [`crate::schema`]) and a typed record structure (see
/// [`crate::rr::rdata`]), and every `match` over it is exhaustive.
/// Adding a variant therefore forces every dispatch site to be
/// revisited.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum RrType {
    A,
    AAAA,
    CNAME,
    MX,
    LOC,
    SRV,
    SPF,
    TXT,
    NS,
    CAA,
    PTR,
    CERT,
    DNSKEY,
    DS,
    NAPTR,
    SMIMEA,
    SSHFP,
    TLSA,
    URI,
}

impl RrType {
    /// Every managed type, in the order used in messages.
    pub const ALL: [RrType; 19] = [
        Self::A,
        Self::AAAA,
        Self::CNAME,
        Self::MX,
        Self::LOC,
        Self::SRV,
        Self::SPF,
        Self::TXT,
        Self::NS,
        Self::CAA,
        Self::PTR,
        Self::CERT,
        Self::DNSKEY,
        Self::DS,
        Self::NAPTR,
        Self::SMIMEA,
        Self::SSHFP,
        Self::TLSA,
        Self::URI,
    ];

    /// Returns the mnemonic of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CNAME => "CNAME",
            Self::MX => "MX",
            Self::LOC => "LOC",
            Self::SRV => "SRV",
            Self::SPF => "SPF",
            Self::TXT => "TXT",
            Self::NS => "NS",
            Self::CAA => "CAA",
            Self::PTR => "PTR",
            Self::CERT => "CERT",
            Self::DNSKEY => "DNSKEY",
            Self::DS => "DS",
            Self::NAPTR => "NAPTR",
            Self::SMIMEA => "SMIMEA",
            Self::SSHFP => "SSHFP",
            Self::TLSA => "TLSA",
            Self::URI => "URI",
        }
    }
}

impl FromStr for RrType {
    type Err = UnknownTypeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rr_type| Caseless(rr_type.as_str()) == Caseless(text))
            .ok_or(UnknownTypeError)
    }
}

impl fmt::Debug for RrType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for RrType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RrType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a type tag is not one of the managed RR
/// types. Its message lists the accepted tags.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct UnknownTypeError;

impl fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("field 'type' must be one of: ")?;
        for (i, rr_type) in RrType::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(rr_type.as_str())?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownTypeError {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_parses_case_insensitively() {
        assert_eq!("aaaa".parse::<RrType>(), Ok(RrType::AAAA));
        assert_eq!("DnsKey".parse::<RrType>(), Ok(RrType::DNSKEY));
        assert_eq!("BOGUS".parse::<RrType>(), Err(UnknownTypeError));
    }

    #[test]
    fn type_displays_uppercase_mnemonic() {
        for rr_type in RrType::ALL {
            assert_eq!(rr_type.to_string().parse::<RrType>(), Ok(rr_type));
            assert_eq!(rr_type.to_string(), rr_type.as_str().to_ascii_uppercase());
        }
    }

    #[test]
    fn unknown_type_message_enumerates_valid_types() {
        assert_eq!(
            UnknownTypeError.to_string(),
            "field 'type' must be one of: A, AAAA, CNAME, MX, LOC, SRV, SPF, TXT, \
             NS, CAA, PTR, CERT, DNSKEY, DS, NAPTR, SMIMEA, SSHFP, TLSA, URI",
        );
    }
}
