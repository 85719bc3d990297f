//! Field references and the absent/null/value three-state
//!
//! The wire format distinguishes a key that is *absent* (to be defaulted)
//! from a key that is explicitly `null` (a meaningful value, e.g. "no column
//! bound"). [`Maybe`] preserves that distinction in the typed model; a plain
//! two-state `Option` would collapse it.

use crate::parse::{Errors, Node, ParseOptions};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Three-state optional: absent, explicitly null, or a value.
///
/// `Absent` fields are skipped on serialization (via
/// `skip_serializing_if = "Maybe::is_absent"`); `Null` serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maybe<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::Absent
    }
}

impl<T> Maybe<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Maybe::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Maybe::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Maybe::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Maybe::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Replaces `Absent` with the given fallback; `Null` and `Value` pass
    /// through untouched. This is the merge rule: only absence is defaulted.
    pub fn defaulted(self, fallback: Maybe<T>) -> Maybe<T> {
        match self {
            Maybe::Absent => fallback,
            other => other,
        }
    }
}

impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Maybe::Absent | Maybe::Null => serializer.serialize_none(),
            Maybe::Value(value) => value.serialize(serializer),
        }
    }
}

/// Data type of a referenced column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Real,
    Integer,
    String,
    Boolean,
    Timestamp,
    Date,
    Geojson,
}

/// A reference to a dataset column, e.g. `{"name": "delta_count", "type":
/// "real"}`. The column must exist in the bound dataset; the cross-reference
/// resolver checks that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRef {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldRef {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let name = obj.require("name", errs).and_then(|n| n.as_string(errs));
        let kind = match obj.get("type") {
            Some(n) => n.enum_variant::<FieldKind>(errs).map(Some),
            None => Some(None),
        };
        let extra = obj.extras(opts, errs);
        Some(Self {
            name: name?,
            kind: kind?,
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maybe_serialization_states() {
        #[derive(Serialize)]
        struct Holder {
            #[serde(skip_serializing_if = "Maybe::is_absent")]
            altitude: Maybe<String>,
        }

        let absent = Holder {
            altitude: Maybe::Absent,
        };
        assert_eq!(serde_json::to_value(absent).unwrap(), json!({}));

        let null = Holder {
            altitude: Maybe::Null,
        };
        assert_eq!(serde_json::to_value(null).unwrap(), json!({ "altitude": null }));

        let bound = Holder {
            altitude: Maybe::Value("elevation".to_string()),
        };
        assert_eq!(
            serde_json::to_value(bound).unwrap(),
            json!({ "altitude": "elevation" })
        );
    }

    #[test]
    fn test_defaulted_never_replaces_null() {
        let null: Maybe<f64> = Maybe::Null;
        assert_eq!(null.defaulted(Maybe::Value(1.0)), Maybe::Null);
        let absent: Maybe<f64> = Maybe::Absent;
        assert_eq!(absent.defaulted(Maybe::Value(1.0)), Maybe::Value(1.0));
    }
}
