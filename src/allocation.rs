//! Item-to-member allocations.
//!
//! Keys are item ids and are not checked against the receipt's items here;
//! the store decides whether dangling keys are tolerated.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from a receipt item to the members sharing its cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocations(BTreeMap<String, BTreeSet<String>>);

impl Allocations {
    pub fn new() -> Self {
        Allocations(BTreeMap::new())
    }

    /// Builds allocations from `(item, members)` pairs.
    pub fn from_pairs<I, M, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, M)>,
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allocations = Allocations::new();
        for (item_id, members) in pairs {
            let set = allocations.0.entry(item_id.into()).or_default();
            set.extend(members.into_iter().map(Into::into));
        }
        allocations
    }

    /// Members assigned to an item, or `None` if the item has no entry.
    pub fn assignees(&self, item_id: &str) -> Option<&BTreeSet<String>> {
        self.0.get(item_id)
    }

    pub fn is_assigned(&self, item_id: &str, member_id: &str) -> bool {
        self.0
            .get(item_id)
            .map(|set| set.contains(member_id))
            .unwrap_or(false)
    }

    /// Adds a member to an item. Returns `false` if already assigned.
    pub fn assign(&mut self, item_id: &str, member_id: &str) -> bool {
        self.0
            .entry(item_id.to_string())
            .or_default()
            .insert(member_id.to_string())
    }

    /// Adds the member if absent, removes it if present.
    ///
    /// Returns `true` if the member is assigned afterwards.
    pub fn toggle(&mut self, item_id: &str, member_id: &str) -> bool {
        let set = self.0.entry(item_id.to_string()).or_default();
        if set.remove(member_id) {
            false
        } else {
            set.insert(member_id.to_string());
            true
        }
    }

    /// Toggles one member on every selected item.
    pub fn toggle_many<S: AsRef<str>>(&mut self, item_ids: &[S], member_id: &str) {
        for item_id in item_ids {
            self.toggle(item_id.as_ref(), member_id);
        }
    }

    /// Replaces an item's assignees.
    pub fn set(&mut self, item_id: &str, members: BTreeSet<String>) {
        self.0.insert(item_id.to_string(), members);
    }

    pub fn remove_item(&mut self, item_id: &str) -> Option<BTreeSet<String>> {
        self.0.remove(item_id)
    }

    /// Number of items a member is assigned to.
    pub fn item_count_for(&self, member_id: &str) -> usize {
        self.0.values().filter(|set| set.contains(member_id)).count()
    }

    /// Returns `true` if any item has at least one assignee.
    pub fn has_assignments(&self) -> bool {
        self.0.values().any(|set| !set.is_empty())
    }

    /// Copy without entries whose assignee set is empty.
    pub fn without_empty(&self) -> Self {
        Allocations(
            self.0
                .iter()
                .filter(|(_, set)| !set.is_empty())
                .map(|(item, set)| (item.clone(), set.clone()))
                .collect(),
        )
    }

    /// Keys that do not name any of the given item ids.
    pub fn dangling_items<'a, 'b, I>(&'a self, item_ids: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'b str>,
    {
        let known: BTreeSet<&'b str> = item_ids.into_iter().collect();
        self.0
            .keys()
            .map(String::as_str)
            .filter(|item| !known.contains(item))
            .collect()
    }

    /// Every distinct member id mentioned in the allocations.
    pub fn member_ids(&self) -> BTreeSet<&str> {
        self.0
            .values()
            .flat_map(|set| set.iter().map(String::as_str))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
