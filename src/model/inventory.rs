use serde::{Deserialize, Serialize};

use crate::model::null_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub quantity: u32,
}

impl InventoryItem {
    /// `Rope (3)` for stacks, plain name otherwise.
    pub fn title(&self) -> String {
        if self.quantity > 1 {
            format!("{} ({})", self.name, self.quantity)
        } else {
            self.name.clone()
        }
    }
}
