//! Matching an actor's spiritual root against a location's essence.
//!
//! A root maps to a set of compatible essence types through the
//! [`AffinityTable`]. Cultivation efficiency is driven by the densest
//! compatible essence present; essence types the root cannot draw on
//! contribute nothing.

use ascension_types::{Essence, EssenceType, Root};

use crate::config::AffinityTable;

/// Compatible essence types present at a location, with their densities.
///
/// Only nonzero densities are returned.
pub fn matching_essences(root: Root, table: &AffinityTable, essence: &Essence) -> Vec<(EssenceType, u8)> {
    let compatible = table.essences_for(root);
    essence
        .present()
        .filter(|(kind, density)| *density > 0 && compatible.contains(kind))
        .collect()
}

/// Whether the root can draw on any essence present at the location.
pub fn has_affinity(root: Root, table: &AffinityTable, essence: &Essence) -> bool {
    !matching_essences(root, table, essence).is_empty()
}

/// The highest compatible density at the location (0 when none match).
pub fn best_density(root: Root, table: &AffinityTable, essence: &Essence) -> u8 {
    matching_essences(root, table, essence)
        .into_iter()
        .map(|(_, density)| density)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    #[test]
    fn fire_root_reads_fire_density() {
        let site = Essence::from_pairs(&[(EssenceType::Fire, 5), (EssenceType::Water, 3)]);
        let table = AffinityTable::default();
        assert!(has_affinity(Root::Fire, &table, &site));
        assert_eq!(best_density(Root::Fire, &table, &site), 5);
    }

    #[test]
    fn no_matching_essence_yields_zero() {
        let site = Essence::from_pairs(&[(EssenceType::Water, 3)]);
        let table = AffinityTable::default();
        assert!(!has_affinity(Root::Fire, &table, &site));
        assert_eq!(best_density(Root::Fire, &table, &site), 0);
    }

    #[test]
    fn multi_essence_root_takes_the_densest() {
        let table = AffinityTable::from_entries(BTreeMap::from([(
            Root::Wood,
            BTreeSet::from([EssenceType::Wood, EssenceType::Water]),
        )]));
        let site = Essence::from_pairs(&[(EssenceType::Wood, 2), (EssenceType::Water, 7)]);
        assert_eq!(matching_essences(Root::Wood, &table, &site).len(), 2);
        assert_eq!(best_density(Root::Wood, &table, &site), 7);
    }
}
