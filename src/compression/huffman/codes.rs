use std::collections::{HashMap, HashSet};

use bitvec::prelude::*;

use super::frequency::FrequencyTable;
use super::tree::HuffmanNode;
use super::Symbol;
use crate::error::{Error, Result};

/// A single Huffman code, most significant (first emitted) bit first.
pub type Code = BitVec<u8, Msb0>;

/// Symbol-to-code and code-to-symbol mappings for one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    /// Codes in left-to-right leaf order.
    entries: Vec<(S, Code)>,
    by_symbol: HashMap<S, usize>,
    by_code: HashMap<Code, usize>,
    max_len: usize,
}

/// Walk the tree and assign every leaf the path leading to it (left = 0,
/// right = 1).
///
/// A tree made of a single leaf has no edges; that symbol gets the code `0`
/// so every emitted symbol still costs at least one bit.
///
/// # Example
///
/// ```
/// use huffpack::compression::huffman::{assign_codes, build_tree};
/// use huffpack::compression::FrequencyTable;
///
/// let tree = build_tree(&FrequencyTable::from_symbols(b"aaabbc")).unwrap();
/// let table = assign_codes(&tree);
/// assert_eq!(table.code(b'a').unwrap().len(), 1);
/// assert_eq!(table.code(b'c').unwrap().len(), 2);
/// ```
pub fn assign_codes<S: Symbol>(root: &HuffmanNode<S>) -> CodeTable<S> {
    let mut entries = Vec::with_capacity(root.leaf_count());
    let mut stack: Vec<(&HuffmanNode<S>, Code)> = vec![(root, Code::new())];

    while let Some((node, path)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                let code = if path.is_empty() {
                    bitvec![u8, Msb0; 0]
                } else {
                    path
                };
                entries.push((*symbol, code));
            }
            HuffmanNode::Internal { left, right, .. } => {
                let mut right_path = path.clone();
                right_path.push(true);
                stack.push((&**right, right_path));
                let mut left_path = path;
                left_path.push(false);
                stack.push((&**left, left_path));
            }
        }
    }

    CodeTable::index(entries)
}

impl<S: Symbol> CodeTable<S> {
    fn index(entries: Vec<(S, Code)>) -> Self {
        let by_symbol = entries
            .iter()
            .enumerate()
            .map(|(i, (symbol, _))| (*symbol, i))
            .collect();
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(i, (_, code))| (code.clone(), i))
            .collect();
        let max_len = entries.iter().map(|(_, code)| code.len()).max().unwrap_or(0);
        CodeTable {
            entries,
            by_symbol,
            by_code,
            max_len,
        }
    }

    /// Build a table from entries read back out of a container.
    ///
    /// The entries must form a usable prefix code: at least one entry, no
    /// empty code, no symbol or code listed twice, and no code that is a
    /// prefix of another.
    pub fn from_entries(entries: Vec<(S, Code)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::malformed("code table has no entries"));
        }
        if let Some((symbol, _)) = entries.iter().find(|(_, code)| code.is_empty()) {
            return Err(Error::malformed(format!(
                "empty code for symbol {:?}",
                symbol
            )));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for (symbol, _) in &entries {
            if !seen.insert(*symbol) {
                return Err(Error::malformed(format!(
                    "symbol {:?} appears twice in code table",
                    symbol
                )));
            }
        }

        // In lexicographic order a code that prefixes another also prefixes
        // its immediate successor, so adjacent pairs are enough.
        let mut sorted: Vec<Vec<bool>> = entries
            .iter()
            .map(|(_, code)| code.iter().by_vals().collect())
            .collect();
        sorted.sort();
        for pair in sorted.windows(2) {
            if pair[1].starts_with(&pair[0]) {
                return Err(Error::malformed("code table is not prefix-free"));
            }
        }

        Ok(Self::index(entries))
    }

    /// Code assigned to `symbol`.
    pub fn code(&self, symbol: S) -> Option<&BitSlice<u8, Msb0>> {
        self.by_symbol
            .get(&symbol)
            .map(|&i| self.entries[i].1.as_bitslice())
    }

    /// Symbol whose code is exactly `code`.
    pub fn symbol(&self, code: &Code) -> Option<S> {
        self.by_code.get(code).map(|&i| self.entries[i].0)
    }

    /// Number of symbols in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest code.
    pub fn max_code_len(&self) -> usize {
        self.max_len
    }

    /// Iterate `(symbol, code)` pairs in left-to-right leaf order.
    pub fn iter(&self) -> impl Iterator<Item = (S, &BitSlice<u8, Msb0>)> + '_ {
        self.entries
            .iter()
            .map(|(symbol, code)| (*symbol, code.as_bitslice()))
    }

    /// Payload bits needed to encode an input with the given counts.
    pub fn encoded_bit_len(&self, freq: &FrequencyTable<S>) -> u64 {
        freq.iter()
            .map(|(symbol, count)| {
                let len = self.code(symbol).map_or(0, |code| code.len());
                count * len as u64
            })
            .sum()
    }

    /// Weighted mean code length in bits per symbol.
    pub fn average_code_len(&self, freq: &FrequencyTable<S>) -> f64 {
        let total = freq.total();
        if total == 0 {
            return 0.0;
        }
        self.encoded_bit_len(freq) as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;
    use crate::compression::huffman::tree::build_tree;

    fn table_for(input: &[u8]) -> CodeTable<u8> {
        let freq = FrequencyTable::from_symbols(input);
        assign_codes(&build_tree(&freq).unwrap())
    }

    fn code_str(code: &BitSlice<u8, Msb0>) -> String {
        code.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
    }

    #[test]
    fn test_aaabbc_codes() {
        let table = table_for(b"aaabbc");
        assert_eq!(code_str(table.code(b'a').unwrap()), "0");
        assert_eq!(code_str(table.code(b'c').unwrap()), "10");
        assert_eq!(code_str(table.code(b'b').unwrap()), "11");
        assert_eq!(table.max_code_len(), 2);

        let leaves: Vec<u8> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(leaves, b"acb");
    }

    #[test]
    fn test_single_symbol_gets_zero_code() {
        let table = table_for(b"aaaa");
        assert_eq!(table.len(), 1);
        assert_eq!(code_str(table.code(b'a').unwrap()), "0");
        assert_eq!(table.symbol(&bitvec![u8, Msb0; 0]), Some(b'a'));
    }

    #[test]
    fn test_prefix_free() {
        let table = table_for(b"this is an example for huffman encoding");
        let codes: Vec<(u8, &BitSlice<u8, Msb0>)> = table.iter().collect();
        for (i, &(a, code_a)) in codes.iter().enumerate() {
            for &(b, code_b) in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
                assert!(!code_b.starts_with(code_a), "{:?} prefixes {:?}", a, b);
                assert!(!code_a.starts_with(code_b), "{:?} prefixes {:?}", b, a);
            }
        }
    }

    #[test]
    fn test_reverse_mapping_matches_forward() {
        let table = table_for(b"mississippi river");
        for (symbol, code) in table.iter() {
            assert_eq!(table.symbol(&code.to_bitvec()), Some(symbol));
        }
    }

    #[test]
    fn test_encoded_bit_len_and_average() {
        let input = b"aaaaaaaabbbc";
        let freq = FrequencyTable::from_symbols(input);
        let table = assign_codes(&build_tree(&freq).unwrap());
        // c and b merge, then the pair merges with a: c=00, b=01, a=1
        assert_eq!(table.encoded_bit_len(&freq), 8 + 3 * 2 + 2);
        let avg = table.average_code_len(&freq);
        assert!((avg - 16.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_entries_rejects_prefix_violation() {
        let entries = vec![(b'a', bitvec![u8, Msb0; 0]), (b'b', bitvec![u8, Msb0; 0, 1])];
        assert!(matches!(
            CodeTable::from_entries(entries),
            Err(Error::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let dup_code = vec![(b'a', bitvec![u8, Msb0; 1]), (b'b', bitvec![u8, Msb0; 1])];
        assert!(CodeTable::from_entries(dup_code).is_err());

        let dup_symbol = vec![(b'a', bitvec![u8, Msb0; 0]), (b'a', bitvec![u8, Msb0; 1])];
        assert!(CodeTable::from_entries(dup_symbol).is_err());

        let empty_code = vec![(b'a', Code::new())];
        assert!(CodeTable::from_entries(empty_code).is_err());

        assert!(CodeTable::<u8>::from_entries(Vec::new()).is_err());
    }

    #[test]
    fn test_from_entries_accepts_assigned_table() {
        let table = table_for(b"abracadabra");
        let entries = table.iter().map(|(s, c)| (s, c.to_bitvec())).collect();
        assert_eq!(CodeTable::from_entries(entries).unwrap(), table);
    }
}
