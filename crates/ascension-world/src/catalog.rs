//! Item catalog: every lootable and sellable item with its market price.
//!
//! The catalog is a read-only lookup table built once at world creation and
//! passed to the engine explicitly. Items are looked up by ID for inventory
//! bookkeeping and by name for sell requests.

use std::collections::BTreeMap;

use ascension_types::ItemId;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Definition of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Unique item ID.
    pub id: ItemId,
    /// Unique display name.
    pub name: String,
    /// Market price per unit in spirit stones.
    pub price: u64,
}

/// Read-only table of item definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, ItemDef>,
    by_name: BTreeMap<String, ItemId>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// Register a new item and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateItemName`] if the name is taken.
    pub fn register(&mut self, name: &str, price: u64) -> Result<ItemId, WorldError> {
        if self.by_name.contains_key(name) {
            return Err(WorldError::DuplicateItemName(name.to_owned()));
        }
        let id = ItemId::new();
        self.by_name.insert(name.to_owned(), id);
        self.items.insert(
            id,
            ItemDef {
                id,
                name: name.to_owned(),
                price,
            },
        );
        Ok(id)
    }

    /// Look up an item by ID.
    pub fn get(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(&id)
    }

    /// Look up an item by its display name.
    pub fn find_by_name(&self, name: &str) -> Option<&ItemDef> {
        self.by_name.get(name).and_then(|id| self.items.get(id))
    }

    /// Unit price of an item.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ItemNotFound`] for unknown IDs.
    pub fn price(&self, id: ItemId) -> Result<u64, WorldError> {
        self.get(id).map(|item| item.price).ok_or(WorldError::ItemNotFound(id))
    }

    /// Display name of an item, or `"unknown item"` for unknown IDs.
    pub fn name_of(&self, id: ItemId) -> &str {
        self.get(id).map_or("unknown item", |item| item.name.as_str())
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn register_and_find() {
        let mut catalog = ItemCatalog::new();
        let id = catalog.register("Wolf Pelt", 12).unwrap();
        assert_eq!(catalog.find_by_name("Wolf Pelt").unwrap().id, id);
        assert_eq!(catalog.price(id).unwrap(), 12);
        assert_eq!(catalog.name_of(id), "Wolf Pelt");
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut catalog = ItemCatalog::new();
        assert!(catalog.register("Spirit Herb", 5).is_ok());
        assert!(matches!(
            catalog.register("Spirit Herb", 9),
            Err(WorldError::DuplicateItemName(_))
        ));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn unknown_item_is_an_error() {
        let catalog = ItemCatalog::new();
        assert!(catalog.price(ItemId::new()).is_err());
        assert!(catalog.find_by_name("nothing").is_none());
    }
}
