use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Identifier of a loot item, unique within its session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LootId(pub u64);

impl fmt::Display for LootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A collectible item lying on the map or carried in a bag.
///
/// The price is looked up from the map's loot table when the item spawns and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    /// Session-unique id.
    pub id: LootId,
    /// Index into the map's loot table.
    #[serde(rename = "type")]
    pub loot_type: usize,
    /// Where the item lies.
    pub position: Position,
    /// Score credited on delivery.
    pub price: i64,
}
