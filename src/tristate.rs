//! Unset / null / value wrapper for optional fields
//!
//! JSON bodies distinguish a field that is absent from one that is explicitly
//! `null`, and configuration distinguishes "not configured" from "configured
//! empty". [`TriState`] models all three states so the distinction survives a
//! round trip instead of collapsing into a zero-value sentinel.
//!
//! In a deserializing struct the field must carry `#[serde(default)]` so a
//! missing key decodes to [`TriState::Unset`]; an explicit `null` decodes to
//! [`TriState::Null`]. When serializing, pair with
//! `#[serde(skip_serializing_if = "TriState::is_unset")]` to omit unset
//! fields while keeping explicit nulls on the wire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum TriState<T> {
    /// The field was never set; omitted from serialized output.
    #[default]
    Unset,
    /// The field was explicitly set to null.
    Null,
    /// The field holds a value.
    Value(T),
}

impl<T> TriState<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, TriState::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TriState::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            TriState::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            TriState::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Collapse to an `Option`, folding `Unset` and `Null` together. Used
    /// when the wire shape only has two states.
    pub fn as_option(&self) -> Option<&T> {
        self.value()
    }
}

impl<T> From<Option<T>> for TriState<T> {
    /// `None` maps to `Null` (present without a value), matching how
    /// server-optional response fields are normalized into state.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => TriState::Value(v),
            None => TriState::Null,
        }
    }
}

impl<T: Serialize> Serialize for TriState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Unset should normally be skipped by the field attribute; if it
            // is serialized anyway, it degrades to null.
            TriState::Unset | TriState::Null => serializer.serialize_none(),
            TriState::Value(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TriState<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A present key deserializes here: null becomes Null, anything else
        // Value. A missing key never reaches this impl and falls back to the
        // container's #[serde(default)] = Unset.
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(default, skip_serializing_if = "TriState::is_unset")]
        field: TriState<String>,
    }

    #[test]
    fn missing_key_is_unset() {
        let h: Holder = serde_json::from_str("{}").unwrap();
        assert!(h.field.is_unset());
    }

    #[test]
    fn explicit_null_is_null() {
        let h: Holder = serde_json::from_str(r#"{"field": null}"#).unwrap();
        assert!(h.field.is_null());
    }

    #[test]
    fn value_round_trips() {
        let h: Holder = serde_json::from_str(r#"{"field": "x"}"#).unwrap();
        assert_eq!(h.field, TriState::Value("x".to_string()));
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"field":"x"}"#);
    }

    #[test]
    fn unset_is_omitted_and_null_is_kept() {
        let unset = Holder {
            field: TriState::Unset,
        };
        assert_eq!(serde_json::to_string(&unset).unwrap(), "{}");

        let null = Holder {
            field: TriState::Null,
        };
        assert_eq!(serde_json::to_string(&null).unwrap(), r#"{"field":null}"#);
    }
}
