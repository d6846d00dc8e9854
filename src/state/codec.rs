//! Key codecs
//!
//! Application keys are opaque to this crate. A [`KeyParceler`] turns them into
//! a [`Parcel`] for persistence and back again. Implementations must round-trip:
//! `to_key(&to_parcelable(k)?)? == k` for every valid key.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StateError;
use super::view::Parcel;

/// Encodes and decodes identity keys of type `K`
pub trait KeyParceler<K> {
    fn to_parcelable(&self, key: &K) -> Result<Parcel, StateError>;

    fn to_key(&self, parcel: &Parcel) -> Result<K, StateError>;
}

/// Serde-backed parceler for any serializable key type
pub struct JsonKeyParceler<K> {
    _key: PhantomData<fn() -> K>,
}

impl<K> JsonKeyParceler<K> {
    pub fn new() -> Self {
        Self { _key: PhantomData }
    }
}

impl<K> Default for JsonKeyParceler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for JsonKeyParceler<K> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<K> std::fmt::Debug for JsonKeyParceler<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonKeyParceler")
            .field("key", &std::any::type_name::<K>())
            .finish()
    }
}

impl<K> KeyParceler<K> for JsonKeyParceler<K>
where
    K: Serialize + DeserializeOwned,
{
    fn to_parcelable(&self, key: &K) -> Result<Parcel, StateError> {
        serde_json::to_value(key).map_err(|e| StateError::KeyEncode(e.to_string()))
    }

    fn to_key(&self, parcel: &Parcel) -> Result<K, StateError> {
        serde_json::from_value(parcel.clone()).map_err(|e| StateError::KeyDecode(e.to_string()))
    }
}
