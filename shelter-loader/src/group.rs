use std::collections::HashMap;
use std::hash::Hash;

/// Group rows by a key extracted from each row, keeping row order per group.
pub fn group_by<K, T, I, F>(items: I, key_of: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key_of(&item)).or_default().push(item);
    }
    groups
}

/// Index rows by a unique key. Later rows win on duplicates.
pub fn index_by<K, T, I, F>(items: I, key_of: F) -> HashMap<K, T>
where
    K: Eq + Hash,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    items.into_iter().map(|item| (key_of(&item), item)).collect()
}

/// One group per key, in key order; unmatched keys get an empty group.
pub fn align_many<K, T>(keys: &[K], groups: HashMap<K, Vec<T>>) -> Vec<Vec<T>>
where
    K: Eq + Hash,
    T: Clone,
{
    keys.iter()
        .map(|key| groups.get(key).cloned().unwrap_or_default())
        .collect()
}

/// One slot per key, in key order; unmatched keys get `None`.
pub fn align_one<K, T>(keys: &[K], index: HashMap<K, T>) -> Vec<Option<T>>
where
    K: Eq + Hash,
    T: Clone,
{
    keys.iter().map(|key| index.get(key).cloned()).collect()
}
