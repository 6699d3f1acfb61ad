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

//! Helpers for the [`RecordData::merge`](super::RecordData::merge)
//! implementations of the individual RR types.

////////////////////////////////////////////////////////////////////////
// HELPERS FOR RecordData::merge                                      //
////////////////////////////////////////////////////////////////////////

/// Overwrites `slot` if a new value was provided.
pub fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Overwrites a string `slot` if a new value was provided.
pub fn set_string(slot: &mut String, value: Option<&str>) {
    if let Some(value) = value {
        value.clone_into(slot);
    }
}

/// Overwrites a text `slot` if a new list of strings was provided. The
/// strings are joined with single spaces.
pub fn set_text(slot: &mut String, value: Option<&[String]>) {
    if let Some(items) = value {
        *slot = items.join(" ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_leave_slots_alone() {
        let mut number = 5u16;
        set(&mut number, None);
        assert_eq!(number, 5);
        set(&mut number, Some(6));
        assert_eq!(number, 6);

        let mut text = String::from("old");
        set_text(&mut text, None);
        assert_eq!(text, "old");
        set_text(&mut text, Some(&["v=spf1".into(), "-all".into()]));
        assert_eq!(text, "v=spf1 -all");
    }
}
