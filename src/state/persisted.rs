//! Flattened, storable form of a state record

use serde::{Deserialize, Deserializer, Serialize};

use super::error::StateError;
use super::view::{Bundle, Parcel, ViewState};

/// A state record flattened for persistence.
///
/// The serialized field names (`KEY`, `VIEW_STATE`, `BUNDLE`) are part of the
/// on-disk format. Optional fields are omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Codec-encoded identity key. Always written; may be missing in foreign input.
    ///
    /// A present `null` is a real encoding (unit keys, `None`) and reads back
    /// as `Some(Value::Null)`.
    #[serde(
        rename = "KEY",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<Parcel>,
    #[serde(rename = "VIEW_STATE", default, skip_serializing_if = "Option::is_none")]
    pub view_state: Option<ViewState>,
    #[serde(rename = "BUNDLE", default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<Bundle>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Parcel>, D::Error> {
    Parcel::deserialize(deserializer).map(Some)
}

impl PersistedState {
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Names of the fields present, in schema order
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::with_capacity(3);
        if self.key.is_some() {
            fields.push("KEY");
        }
        if self.view_state.is_some() {
            fields.push("VIEW_STATE");
        }
        if self.bundle.is_some() {
            fields.push("BUNDLE");
        }
        fields
    }
}
