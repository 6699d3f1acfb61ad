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

//! Crate-private utilities.

/// A wrapper around [`str`] references whose [`PartialEq`] and [`Eq`]
/// implementations are ASCII-case-insensitive.
pub struct Caseless<'a>(pub &'a str);

impl PartialEq for Caseless<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(other.0)
    }
}

impl Eq for Caseless<'_> {}

/// Determines whether `text` is a non-empty string of hexadecimal
/// digits with an even number of digits (i.e., whether it encodes a
/// whole number of octets). Both upper- and lower-case digits are
/// accepted.
pub fn is_hex_octets(text: &str) -> bool {
    !text.is_empty()
        && text.len() % 2 == 0
        && text.bytes().all(|b| ascii_hex_digit_to_nibble(b).is_some())
}

/// Converts an ASCII hexadecimal digit to its numeric value. This
/// returns [`None`] if `digit` is not one of the ASCII characters
/// `0` through `9`, `A` through `F`, or `a` through `f`.
pub fn ascii_hex_digit_to_nibble(digit: u8) -> Option<u8> {
    if (b'0'..=b'9').contains(&digit) {
        Some(digit - b'0')
    } else if (b'A'..=b'F').contains(&digit) {
        Some(digit - b'A' + 10)
    } else if (b'a'..=b'f').contains(&digit) {
        Some(digit - b'a' + 10)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caseless_ignores_ascii_case() {
        assert!(Caseless("dnskey") == Caseless("DNSKEY"));
        assert!(Caseless("ds") != Caseless("dnskey"));
    }

    #[test]
    fn hex_octets_must_be_whole() {
        assert!(is_hex_octets("00ffAB"));
        assert!(!is_hex_octets("abc"));
        assert!(!is_hex_octets(""));
        assert!(!is_hex_octets("0g"));
    }
}
