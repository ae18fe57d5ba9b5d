use std::collections::HashMap;

use super::Symbol;

/// Symbol counts for one input, kept in first-appearance order.
///
/// The order matters: tree construction breaks frequency ties by it, so two
/// tables built from the same input always produce the same tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: Vec<(S, u64)>,
    index: HashMap<S, usize>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Count every symbol in `input`.
    ///
    /// # Example
    ///
    /// ```
    /// use huffpack::compression::FrequencyTable;
    ///
    /// let freq = FrequencyTable::from_symbols(b"aaabbc");
    /// assert_eq!(freq.get(b'a'), 3);
    /// assert_eq!(freq.get(b'c'), 1);
    /// assert_eq!(freq.total(), 6);
    /// ```
    pub fn from_symbols(input: &[S]) -> Self {
        let mut counts: Vec<(S, u64)> = Vec::new();
        let mut index = HashMap::new();
        for &symbol in input {
            let slot = *index.entry(symbol).or_insert_with(|| {
                counts.push((symbol, 0));
                counts.len() - 1
            });
            counts[slot].1 += 1;
        }
        FrequencyTable { counts, index }
    }

    /// Occurrences of `symbol`, zero when absent.
    pub fn get(&self, symbol: S) -> u64 {
        self.index
            .get(&symbol)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&(_, count)| count).sum()
    }

    /// Iterate `(symbol, count)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().copied()
    }
}
