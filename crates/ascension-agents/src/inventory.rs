//! Item bags carried by actors.
//!
//! Quantities use checked arithmetic; a removal that would go below zero
//! fails without touching the bag. Entries that reach zero are dropped so
//! an empty bag compares equal to a fresh one.

use std::collections::BTreeMap;

use ascension_types::ItemId;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Items held by one actor, `ItemId -> quantity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<ItemId, u32>);

impl Inventory {
    /// An empty bag.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Units of `item` held.
    pub fn quantity(&self, item: ItemId) -> u32 {
        self.0.get(&item).copied().unwrap_or(0)
    }

    /// Whether the bag holds at least `amount` of `item`.
    pub fn has(&self, item: ItemId, amount: u32) -> bool {
        self.quantity(item) >= amount
    }

    /// Add `amount` units of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if the quantity would
    /// overflow.
    pub fn add(&mut self, item: ItemId, amount: u32) -> Result<(), AgentError> {
        if amount == 0 {
            return Ok(());
        }
        let next = self
            .quantity(item)
            .checked_add(amount)
            .ok_or_else(|| AgentError::overflow("inventory quantity overflow"))?;
        self.0.insert(item, next);
        Ok(())
    }

    /// Remove `amount` units of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InsufficientItem`] (leaving the bag unchanged)
    /// if fewer than `amount` units are held.
    pub fn remove(&mut self, item: ItemId, amount: u32) -> Result<(), AgentError> {
        let available = self.quantity(item);
        let remaining = available
            .checked_sub(amount)
            .ok_or(AgentError::InsufficientItem {
                item,
                requested: amount,
                available,
            })?;
        if remaining == 0 {
            self.0.remove(&item);
        } else {
            self.0.insert(item, remaining);
        }
        Ok(())
    }

    /// Iterate over held items.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.0.iter().map(|(&item, &qty)| (item, qty))
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove() {
        let item = ItemId::new();
        let mut bag = Inventory::new();
        assert!(bag.add(item, 3).is_ok());
        assert!(bag.has(item, 3));
        assert!(bag.remove(item, 2).is_ok());
        assert_eq!(bag.quantity(item), 1);
    }

    #[test]
    fn over_removal_leaves_bag_unchanged() {
        let item = ItemId::new();
        let mut bag = Inventory::new();
        assert!(bag.add(item, 2).is_ok());
        let before = bag.clone();
        assert!(matches!(
            bag.remove(item, 5),
            Err(AgentError::InsufficientItem {
                requested: 5,
                available: 2,
                ..
            })
        ));
        assert_eq!(bag, before);
    }

    #[test]
    fn emptied_entries_are_dropped() {
        let item = ItemId::new();
        let mut bag = Inventory::new();
        assert!(bag.add(item, 1).is_ok());
        assert!(bag.remove(item, 1).is_ok());
        assert!(bag.is_empty());
        assert_eq!(bag, Inventory::new());
    }

    #[test]
    fn overflow_is_an_error() {
        let item = ItemId::new();
        let mut bag = Inventory::new();
        assert!(bag.add(item, u32::MAX).is_ok());
        assert!(bag.add(item, 1).is_err());
        assert_eq!(bag.quantity(item), u32::MAX);
    }
}
