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

//! Evaluation of a role's access patterns against record names.
//!
//! A role carries two patterns, `allow` and `deny`. Access to a name is
//! granted only if the name matches `allow` and does not match `deny`:
//! deny overrides allow, and a name matching neither is denied.
//!
//! # Pattern syntax
//!
//! A pattern is a comma-separated list of alternatives; whitespace
//! around alternatives and empty alternatives are ignored, so the empty
//! pattern matches nothing. Each alternative is one of
//!
//! * `*`, which matches every name;
//! * `*.suffix`, which matches every name strictly below `suffix`
//!   (`*.example.com` matches `www.example.com` and `a.b.example.com`,
//!   but not `example.com`);
//! * a domain name, which matches only itself.
//!
//! Alternatives compare like record names: case-insensitively, and with
//! or without a trailing dot.

use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::name::{self, RecordName};
use crate::roles::Role;

////////////////////////////////////////////////////////////////////////
// EVALUATION                                                         //
////////////////////////////////////////////////////////////////////////

/// Decides whether `role` may access records owned by `name`.
///
/// Patterns are validated when roles are written, so parse failures
/// here mean the stored role predates validation or was edited by hand.
/// Such a deny pattern denies everything; such an allow pattern allows
/// nothing.
pub fn evaluate(role: &Role, name: &RecordName) -> bool {
    match role.deny.parse::<Pattern>() {
        Ok(deny) if deny.matches(name) => return false,
        Ok(_) => (),
        Err(e) => {
            warn!("role '{}' has an unusable deny pattern: {}", role.name, e);
            return false;
        }
    }

    match role.allow.parse::<Pattern>() {
        Ok(allow) => allow.matches(name),
        Err(e) => {
            warn!("role '{}' has an unusable allow pattern: {}", role.name, e);
            false
        }
    }
}

////////////////////////////////////////////////////////////////////////
// PATTERNS                                                           //
////////////////////////////////////////////////////////////////////////

/// A parsed access pattern.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pattern {
    alternatives: Vec<Alternative>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Alternative {
    Everything,
    Below(RecordName),
    Exactly(RecordName),
}

impl Pattern {
    /// Returns whether `name` matches any alternative of the pattern.
    pub fn matches(&self, name: &RecordName) -> bool {
        self.alternatives.iter().any(|alternative| match alternative {
            Alternative::Everything => true,
            Alternative::Below(suffix) => name.is_strict_subdomain_of(suffix),
            Alternative::Exactly(exact) => name == exact,
        })
    }

    /// Returns whether the pattern has no alternatives, and thus
    /// matches nothing.
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut alternatives = Vec::new();
        for alternative in text.split(',').map(str::trim) {
            if alternative.is_empty() {
                continue;
            } else if alternative == "*" {
                alternatives.push(Alternative::Everything);
                continue;
            }

            let name: RecordName = alternative.parse().map_err(|cause| PatternError {
                alternative: alternative.to_owned(),
                cause,
            })?;
            if name.is_wildcard() {
                alternatives.push(match name.superdomain(1) {
                    Some(suffix) => Alternative::Below(suffix),
                    None => Alternative::Everything,
                });
            } else {
                alternatives.push(Alternative::Exactly(name));
            }
        }
        Ok(Self { alternatives })
    }
}

/// An error signaling that an alternative of a pattern is not a valid
/// name or wildcard.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatternError {
    alternative: String,
    cause: name::Error,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid pattern '{}': {}", self.alternative, self.cause)
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn role(allow: &str, deny: &str) -> Role {
        Role {
            name: "test".into(),
            description: String::new(),
            allow: allow.into(),
            deny: deny.into(),
        }
    }

    fn name(text: &str) -> RecordName {
        text.parse().unwrap()
    }

    #[test]
    fn deny_overrides_allow() {
        let role = role("*.example.com", "secret.example.com");
        assert!(evaluate(&role, &name("www.example.com")));
        assert!(!evaluate(&role, &name("secret.example.com")));
    }

    #[test]
    fn names_matching_nothing_are_denied() {
        let scoped = role("*.example.com", "");
        assert!(!evaluate(&scoped, &name("www.example.org")));
        assert!(!evaluate(&role("", ""), &name("www.example.com")));
    }

    #[test]
    fn wildcards_match_strictly_below_their_suffix() {
        let pattern: Pattern = "*.example.com".parse().unwrap();
        assert!(pattern.matches(&name("www.example.com")));
        assert!(pattern.matches(&name("a.b.example.com")));
        assert!(!pattern.matches(&name("example.com")));
        assert!(!pattern.matches(&name("badexample.com")));
    }

    #[test]
    fn alternatives_are_normalized() {
        let pattern: Pattern = " WWW.Example.com. , , mail.example.com ".parse().unwrap();
        assert!(pattern.matches(&name("www.example.com")));
        assert!(pattern.matches(&name("mail.example.com.")));
        assert!(!pattern.matches(&name("ftp.example.com")));
    }

    #[test]
    fn star_and_empty_patterns() {
        let everything: Pattern = "*".parse().unwrap();
        assert!(everything.matches(&name("anything.test")));
        let nothing: Pattern = " , ".parse().unwrap();
        assert!(nothing.is_empty());
        assert!(!nothing.matches(&name("anything.test")));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let error = "www.example.com, a..b".parse::<Pattern>().unwrap_err();
        assert_eq!(error.alternative, "a..b");
        assert!("foo.*.com".parse::<Pattern>().is_err());
    }

    #[test]
    fn unusable_patterns_fail_closed() {
        assert!(!evaluate(&role("*", "a..b"), &name("www.example.com")));
        assert!(!evaluate(&role("a..b", ""), &name("www.example.com")));
    }
}
