//! Partial-update field marker.
//!
//! A plain `Option<T>` cannot tell "field omitted" from "field sent as null".
//! [`Patch`] keeps the three cases apart so merge logic only touches the
//! fields a caller actually supplied.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CreditError;

/// One field of a partial update.
///
/// Declare patch struct fields with `#[serde(default)]` so an omitted key
/// becomes [`Patch::Absent`], and with
/// `#[serde(skip_serializing_if = "Patch::is_absent")]` so it stays omitted on
/// the way out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key not present; leave the stored value alone.
    Absent,
    /// Key present with `null`.
    Null,
    /// Key present with a value.
    Value(T),
}

impl<T> Patch<T> {
    /// Whether the key was omitted.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Apply to a required field. `null` is rejected.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` naming `field` when the patch is `Null`.
    pub fn apply_required(self, field: &str, target: &mut T) -> Result<(), CreditError> {
        match self {
            Self::Absent => Ok(()),
            Self::Null => Err(CreditError::invalid(format!("{field} cannot be null"))),
            Self::Value(value) => {
                *target = value;
                Ok(())
            }
        }
    }

    /// Apply to an optional field. `null` clears it.
    pub fn apply_optional(self, target: &mut Option<T>) {
        match self {
            Self::Absent => {}
            Self::Null => *target = None,
            Self::Value(value) => *target = Some(value),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Null, Self::Value))
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Value(value) => value.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    struct Sample {
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        name: Patch<String>,
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        note: Patch<String>,
    }

    #[test]
    fn omitted_null_and_value_are_distinct() {
        let sample: Sample = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(sample.name, Patch::Absent);
        assert_eq!(sample.note, Patch::Null);

        let sample: Sample = serde_json::from_str(r#"{"name": "An"}"#).unwrap();
        assert_eq!(sample.name, Patch::Value("An".to_string()));
        assert_eq!(sample.note, Patch::Absent);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let sample = Sample {
            name: Patch::Value("An".into()),
            note: Patch::Null,
        };
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json, serde_json::json!({"name": "An", "note": null}));

        let json = serde_json::to_value(Sample::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn required_field_rejects_null() {
        let mut target = 5_i64;
        Patch::<i64>::Absent.apply_required("amount", &mut target).unwrap();
        assert_eq!(target, 5);

        Patch::Value(9).apply_required("amount", &mut target).unwrap();
        assert_eq!(target, 9);

        let err = Patch::<i64>::Null
            .apply_required("amount", &mut target)
            .unwrap_err();
        assert!(err.to_string().contains("amount"));
        assert_eq!(target, 9);
    }

    #[test]
    fn optional_field_null_clears() {
        let mut note = Some("period 1".to_string());
        Patch::<String>::Absent.apply_optional(&mut note);
        assert_eq!(note.as_deref(), Some("period 1"));

        Patch::<String>::Null.apply_optional(&mut note);
        assert_eq!(note, None);
    }
}
