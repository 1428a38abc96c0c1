//! Decoding helpers for fields the server may send as `null`.
//!
//! The API server writes empty slices and unset nested objects as `null`
//! rather than omitting them.

use serde::{Deserialize, Deserializer};

/// Decode `null` the same as a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
