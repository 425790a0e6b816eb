// trellis_core/src/models/empirical/table.rs

use std::collections::HashMap;
use std::hash::Hash;

/// Raw co-occurrence counts: `key -> {value -> count}`.
#[derive(Debug, Clone)]
pub struct CountTable<K, V> {
    rows: HashMap<K, HashMap<V, u64>>,
}

impl<K, V> Default for CountTable<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Eq + Hash> CountTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: K, value: V) {
        *self.rows.entry(key).or_default().entry(value).or_insert(0) += 1;
    }

    /// Count for `(key, value)`; absent pairs are 0.
    pub fn count(&self, key: &K, value: &V) -> u64 {
        self.rows
            .get(key)
            .and_then(|row| row.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of every count in `key`'s row.
    pub fn row_total(&self, key: &K) -> u64 {
        self.rows.get(key).map_or(0, |row| row.values().sum())
    }

    pub fn total(&self) -> u64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Divides every row by its own total. Rows with no mass come out empty.
    pub fn normalize(self) -> ProbabilityTable<K, V> {
        let rows = self
            .rows
            .into_iter()
            .map(|(key, row)| {
                let total: u64 = row.values().sum();
                let probabilities = if total == 0 {
                    HashMap::new()
                } else {
                    row.into_iter()
                        .map(|(value, count)| (value, count as f64 / total as f64))
                        .collect()
                };
                (key, probabilities)
            })
            .collect();
        ProbabilityTable { rows }
    }
}

/// Conditional probabilities `P(value | key)` with an absent-means-zero lookup.
#[derive(Debug, Clone)]
pub struct ProbabilityTable<K, V> {
    rows: HashMap<K, HashMap<V, f64>>,
}

impl<K: Eq + Hash, V: Eq + Hash> ProbabilityTable<K, V> {
    /// `P(value | key)`, 0 for anything never observed.
    pub fn probability(&self, key: &K, value: &V) -> f64 {
        self.rows
            .get(key)
            .and_then(|row| row.get(value))
            .copied()
            .unwrap_or(0.0)
    }

    /// The nonzero entries of `key`'s row, empty when the key was never seen.
    pub fn row(&self, key: &K) -> impl Iterator<Item = (&V, f64)> + '_ {
        self.rows
            .get(key)
            .into_iter()
            .flat_map(|row| row.iter().map(|(value, p)| (value, *p)))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.rows.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalizes_each_row_independently() {
        let mut counts = CountTable::new();
        counts.increment('a', 1);
        counts.increment('a', 1);
        counts.increment('a', 2);
        counts.increment('b', 7);
        assert_eq!(counts.row_total(&'a'), 3);
        assert_eq!(counts.total(), 4);

        let table = counts.normalize();
        assert_abs_diff_eq!(table.probability(&'a', &1), 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(table.probability(&'a', &2), 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(table.probability(&'b', &7), 1.0);
    }

    #[test]
    fn absent_pairs_read_as_zero() {
        let mut counts = CountTable::new();
        counts.increment(0u8, 0u8);
        let table = counts.normalize();
        assert_eq!(table.probability(&0, &1), 0.0);
        assert_eq!(table.probability(&9, &0), 0.0);
        assert_eq!(table.row(&9).count(), 0);
    }
}
