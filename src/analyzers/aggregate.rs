use crate::analyzers::types::{AggregateEntry, GroupRatings};
use std::collections::BTreeMap;
use tracing::debug;

/// Folds every member's ratings into one entry per item, keyed by item id.
///
/// Members are visited in the group's order and each member's ratings in
/// their stored order. An item's name is fixed by the first member seen
/// rating it; later members only contribute values.
pub fn aggregate(group: &GroupRatings) -> BTreeMap<u64, AggregateEntry> {
    let mut items: BTreeMap<u64, AggregateEntry> = BTreeMap::new();

    for set in group.iter() {
        for rating in set.ratings() {
            let entry = items
                .entry(rating.item_id)
                .or_insert_with(|| AggregateEntry {
                    item_id: rating.item_id,
                    item_name: rating.item_name.clone(),
                    ratings: Vec::new(),
                });

            if entry.item_name != rating.item_name {
                debug!(
                    item_id = rating.item_id,
                    kept = %entry.item_name,
                    seen = %rating.item_name,
                    member = %set.member,
                    "Item name differs between members"
                );
            }

            entry.ratings.push(rating.rating);
        }
    }

    items
}
