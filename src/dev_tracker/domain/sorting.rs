//! Display orderings for the to-implement, testing and verified lists.
//!
//! Every sort is stable, so ties keep store order.

use super::DevItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

/// Ordering of the to-implement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementSort {
    /// Most urgent first, then oldest first.
    #[default]
    PriorityOldest,
    /// Oldest first.
    Oldest,
    /// Newest first.
    Newest,
}

/// Ordering of the testing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestingSort {
    /// Oldest first.
    #[default]
    Oldest,
    /// Newest first.
    Newest,
}

/// Sorts the to-implement list in place.
pub fn sort_to_implement(items: &mut [DevItem], mode: ImplementSort) {
    match mode {
        ImplementSort::PriorityOldest => {
            items.sort_by_key(|item| (item.priority().rank(), item.created_at()));
        }
        ImplementSort::Oldest => items.sort_by_key(DevItem::created_at),
        ImplementSort::Newest => items.sort_by_key(|item| Reverse(item.created_at())),
    }
}

/// Sorts the testing list in place.
pub fn sort_testing(items: &mut [DevItem], mode: TestingSort) {
    match mode {
        TestingSort::Oldest => items.sort_by_key(DevItem::created_at),
        TestingSort::Newest => items.sort_by_key(|item| Reverse(item.created_at())),
    }
}

/// UTC day an item was verified on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionDay {
    /// Verified on this day.
    Day(NaiveDate),
    /// No completion time was recorded.
    Unknown,
}

impl fmt::Display for CompletionDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{day}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Verified items sharing a completion day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedGroup {
    /// Completion day.
    pub day: CompletionDay,
    /// Items in store order.
    pub items: Vec<DevItem>,
}

/// Groups items by completion day, latest day first and unknown last.
#[must_use]
pub fn group_verified(items: Vec<DevItem>) -> Vec<VerifiedGroup> {
    let mut by_day: BTreeMap<Reverse<NaiveDate>, Vec<DevItem>> = BTreeMap::new();
    let mut unknown = Vec::new();
    for item in items {
        match item.completed_at() {
            Some(completed_at) => by_day
                .entry(Reverse(completed_at.date_naive()))
                .or_default()
                .push(item),
            None => unknown.push(item),
        }
    }
    let mut groups: Vec<VerifiedGroup> = by_day
        .into_iter()
        .map(|(Reverse(day), day_items)| VerifiedGroup {
            day: CompletionDay::Day(day),
            items: day_items,
        })
        .collect();
    if !unknown.is_empty() {
        groups.push(VerifiedGroup {
            day: CompletionDay::Unknown,
            items: unknown,
        });
    }
    groups
}
