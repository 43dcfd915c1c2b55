//! Merge rules for update requests.
//!
//! | JSON            | effect on the stored value |
//! |-----------------|----------------------------|
//! | field omitted   | kept                       |
//! | `null`          | kept                       |
//! | `""`            | kept                       |
//! | `"value"`       | replaced by `value`        |
//!
//! Clients that serialise unset optionals as `null` or `""` therefore never
//! wipe stored data. There is no wire form that clears a field.

use serde::{Deserialize, Deserializer};

/// `deserialize_with` hook for optional string fields of an update body.
/// `null` and `""` both decode to `None`; pair with `#[serde(default)]` so
/// an omitted field is `None` as well.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|v| v.filter(|s| !s.is_empty()))
}

/// The value a patch field writes, if any. Empty strings count as absent
/// even when a caller builds the patch by hand.
pub fn replacement(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Overwrite `slot` only when `value` carries a replacement.
pub fn merge_into(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = replacement(value) {
        *slot = Some(v.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_non_empty_values_replace() {
        let mut slot = Some("Alice".to_string());

        merge_into(&mut slot, &None);
        assert_eq!(slot.as_deref(), Some("Alice"));

        merge_into(&mut slot, &Some(String::new()));
        assert_eq!(slot.as_deref(), Some("Alice"));

        merge_into(&mut slot, &Some("Bob".to_string()));
        assert_eq!(slot.as_deref(), Some("Bob"));
    }

    #[test]
    fn merge_fills_an_empty_slot() {
        let mut slot = None;
        merge_into(&mut slot, &Some("1 Main St".to_string()));
        assert_eq!(slot.as_deref(), Some("1 Main St"));
    }
}
