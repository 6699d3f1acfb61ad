// Copyright 2021 Matthew Ingwersen.
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

//! Implementation of the [`RecordName`] type for normalized owner
//! names.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

mod error;
pub use error::Error;

/// The maximum length of the uncompressed on-the-wire representation of
/// a domain name.
const MAX_WIRE_LEN: usize = 255;

/// The maximum length of a label in a domain name (not including the
/// octet that provides the length).
const MAX_LABEL_LEN: usize = 63;

////////////////////////////////////////////////////////////////////////
// RECORD NAME STRUCTURE                                              //
////////////////////////////////////////////////////////////////////////

/// A normalized, fully-qualified domain name that owns records.
///
/// Normalization happens once, when the name is parsed with its
/// [`FromStr`] implementation:
///
/// * ASCII letters are folded to lowercase, since DNS names compare
///   case-insensitively ([RFC 4343]);
/// * the name is made fully qualified, i.e. `www.example.com` and
///   `www.example.com.` both become `www.example.com.`.
///
/// Because every `RecordName` is in this canonical form, two names
/// refer to the same node exactly when their strings are equal. This is
/// what lets authorization and storage agree on record identity.
///
/// Labels may consist of ASCII letters, digits, hyphens, and
/// underscores (the latter for names like `_sip._tcp.example.com.`). A
/// leftmost label of `*` is permitted so that wildcard owners can be
/// managed. The root name is rejected.
///
/// [RFC 4343]: https://datatracker.ietf.org/doc/html/rfc4343
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct RecordName(String);

impl RecordName {
    /// Returns the normalized textual form, including the trailing dot.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the `RecordName` is a wildcard domain name (i.e.,
    /// its leftmost label is `*`).
    pub fn is_wildcard(&self) -> bool {
        self.0.starts_with("*.")
    }

    /// Returns whether this name lies strictly below `other` in the
    /// namespace, i.e. whether it has at least one more label and ends
    /// with all of `other`'s labels.
    pub fn is_strict_subdomain_of(&self, other: &RecordName) -> bool {
        self.0.len() > other.0.len()
            && self.0.ends_with(&other.0)
            && self.0.as_bytes()[self.0.len() - other.0.len() - 1] == b'.'
    }

    /// Returns the superdomain obtained by removing the `skip` leftmost
    /// labels. Returns [`None`] if that would remove every label.
    pub fn superdomain(&self, skip: usize) -> Option<RecordName> {
        let mut rest = self.0.as_str();
        for _ in 0..skip {
            let (_, after) = rest.split_once('.')?;
            rest = after;
        }
        if rest.is_empty() {
            None
        } else {
            Some(Self(rest.to_owned()))
        }
    }
}

impl FromStr for RecordName {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Err(Error::StrEmpty);
        } else if !text.is_ascii() {
            return Err(Error::StrNotAscii);
        }

        let relative = text.strip_suffix('.').unwrap_or(text);
        if relative.is_empty() {
            return Err(Error::NoLabelsProvided);
        }

        let mut wire_len = 1;
        for (i, label) in relative.split('.').enumerate() {
            validate_label(label, i == 0)?;
            wire_len += label.len() + 1;
        }
        if wire_len > MAX_WIRE_LEN {
            return Err(Error::NameTooLong);
        }

        let mut normalized = relative.to_ascii_lowercase();
        normalized.push('.');
        Ok(Self(normalized))
    }
}

/// Checks a single label. `leftmost` indicates whether the label is
/// the first one, which is the only place an asterisk may appear.
fn validate_label(label: &str, leftmost: bool) -> Result<(), Error> {
    if label.is_empty() {
        Err(Error::NullNonTerminal)
    } else if label.len() > MAX_LABEL_LEN {
        Err(Error::LabelTooLong)
    } else if label == "*" {
        if leftmost {
            Ok(())
        } else {
            Err(Error::MisplacedAsterisk)
        }
    } else if label.contains('*') {
        Err(Error::MisplacedAsterisk)
    } else if label
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        Ok(())
    } else {
        Err(Error::InvalidCharacter)
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for RecordName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_folds_case_and_qualifies() {
        let relative: RecordName = "WWW.Example.COM".parse().unwrap();
        let absolute: RecordName = "www.example.com.".parse().unwrap();
        assert_eq!(relative, absolute);
        assert_eq!(relative.as_str(), "www.example.com.");
    }

    #[test]
    fn parsing_rejects_bad_names() {
        assert_eq!("".parse::<RecordName>(), Err(Error::StrEmpty));
        assert_eq!(".".parse::<RecordName>(), Err(Error::NoLabelsProvided));
        assert_eq!("a..b".parse::<RecordName>(), Err(Error::NullNonTerminal));
        assert_eq!(".a".parse::<RecordName>(), Err(Error::NullNonTerminal));
        assert_eq!("a b.test".parse::<RecordName>(), Err(Error::InvalidCharacter));
        assert_eq!("é.test".parse::<RecordName>(), Err(Error::StrNotAscii));
        assert_eq!("a.*.test".parse::<RecordName>(), Err(Error::MisplacedAsterisk));
        assert_eq!("a*.test".parse::<RecordName>(), Err(Error::MisplacedAsterisk));
    }

    #[test]
    fn parsing_enforces_length_limits() {
        let long_label = "a".repeat(64);
        assert_eq!(
            format!("{long_label}.test").parse::<RecordName>(),
            Err(Error::LabelTooLong),
        );

        // 4 labels of 63 octets: 4 * 64 + 1 = 257 octets on the wire.
        let label = "a".repeat(63);
        let too_long = [label.as_str(); 4].join(".");
        assert_eq!(too_long.parse::<RecordName>(), Err(Error::NameTooLong));
    }

    #[test]
    fn underscores_and_wildcards_are_accepted() {
        let srv: RecordName = "_sip._tcp.example.com".parse().unwrap();
        assert_eq!(srv.as_str(), "_sip._tcp.example.com.");
        let wildcard: RecordName = "*.example.com".parse().unwrap();
        assert!(wildcard.is_wildcard());
        assert!(!srv.is_wildcard());
    }

    #[test]
    fn subdomain_test_respects_label_boundaries() {
        let apex: RecordName = "example.com".parse().unwrap();
        let www: RecordName = "www.example.com".parse().unwrap();
        let deep: RecordName = "a.b.example.com".parse().unwrap();
        let lookalike: RecordName = "badexample.com".parse().unwrap();
        assert!(www.is_strict_subdomain_of(&apex));
        assert!(deep.is_strict_subdomain_of(&apex));
        assert!(!apex.is_strict_subdomain_of(&apex));
        assert!(!lookalike.is_strict_subdomain_of(&apex));
    }

    #[test]
    fn superdomain_strips_labels() {
        let name: RecordName = "*.example.com".parse().unwrap();
        assert_eq!(name.superdomain(1).unwrap().as_str(), "example.com.");
        assert_eq!(name.superdomain(0).unwrap(), name);
        assert!(name.superdomain(3).is_none());
    }
}
