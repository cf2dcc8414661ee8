use serde::{Deserialize, Deserializer};

pub mod inventory;
pub mod message;
pub mod npc;
pub mod player;
pub mod scenario;

/// Treats an explicit JSON `null` the same as a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
