//! Huffman coding implementation.
//!
//! Huffman coding assigns every symbol of the input a prefix-free bit string
//! whose length shrinks as the symbol's frequency grows. Developed by David
//! Huffman in 1952, it is the entropy stage of DEFLATE, JPEG and bzip2.
//!
//! This implementation provides:
//! - Frequency analysis and deterministic tree construction
//! - Code assignment with a one-bit code for single-symbol inputs
//! - Bit packing with an explicit padding count
//! - A self-describing container that embeds the code table
//!
//! # Pipeline
//!
//! `compress` runs frequency counting, tree building, code assignment,
//! encoding, padding and byte packing, then wraps the result in a container.
//! `decompress` parses the container, unpacks and unpads the bits and decodes
//! them against the embedded table. Each call is self-contained; nothing is
//! shared between calls.
//!
//! # Example
//!
//! ```
//! use huffpack::compression::huffman::{compress, decompress};
//!
//! let packed = compress(b"abracadabra").unwrap();
//! let unpacked: Vec<u8> = decompress(&packed).unwrap();
//! assert_eq!(unpacked, b"abracadabra");
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

use crate::compression::{Compression, Result};
use crate::error::Error;

pub mod bits;
pub mod codes;
pub mod container;
pub mod frequency;
pub mod tree;

pub use codes::{assign_codes, Code, CodeTable};
pub use frequency::FrequencyTable;
pub use tree::{build_tree, HuffmanNode};

/// One unit of input that can be counted, coded and stored in a container.
pub trait Symbol: Copy + Eq + Hash + Debug {
    /// Tag recorded in the container so data is decoded as the kind it was
    /// encoded from.
    const KIND: u8;
    /// Bytes taken by one symbol in the code table.
    const WIDTH: usize;

    /// Append the `WIDTH`-byte little-endian form of the symbol.
    fn write_to(self, out: &mut Vec<u8>);

    /// Read a symbol back from exactly `WIDTH` bytes.
    fn read_from(bytes: &[u8]) -> Option<Self>;
}

impl Symbol for u8 {
    const KIND: u8 = 1;
    const WIDTH: usize = 1;

    fn write_to(self, out: &mut Vec<u8>) {
        out.push(self);
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [byte] => Some(*byte),
            _ => None,
        }
    }
}

impl Symbol for char {
    const KIND: u8 = 2;
    const WIDTH: usize = 4;

    fn write_to(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32::from(self).to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 4] = bytes.try_into().ok()?;
        char::from_u32(u32::from_le_bytes(raw))
    }
}

/// Everything produced while compressing one input.
struct Encoded<S: Symbol> {
    freq: FrequencyTable<S>,
    table: CodeTable<S>,
    payload_bits: usize,
    container: Vec<u8>,
}

fn encode_container<S: Symbol>(input: &[S]) -> Result<Encoded<S>> {
    let freq = FrequencyTable::from_symbols(input);
    let tree = build_tree(&freq).ok_or(Error::EmptyInput)?;
    let table = assign_codes(&tree);

    let payload = bits::encode(input, &table)?;
    let padded = bits::pad(&payload);
    let packed = bits::to_bytes(&padded)?;
    let container = container::serialize(&table, &packed)?;

    debug!(
        "compressed {} symbols ({} distinct, tree depth {}) into {} payload bits, {} bytes total",
        input.len(),
        freq.len(),
        tree.depth(),
        payload.len(),
        container.len()
    );

    Ok(Encoded {
        freq,
        table,
        payload_bits: payload.len(),
        container,
    })
}

/// Compress `input` into a self-describing container.
///
/// Fails with [`Error::EmptyInput`] when `input` has no symbols.
pub fn compress<S: Symbol>(input: &[S]) -> Result<Vec<u8>> {
    encode_container(input).map(|encoded| encoded.container)
}

/// Recover the symbols stored in a container produced by [`compress`].
///
/// Fails with [`Error::MalformedContainer`] when the container structure is
/// invalid and [`Error::CorruptCode`] when the payload does not decode
/// against the embedded table.
pub fn decompress<S: Symbol>(data: &[u8]) -> Result<Vec<S>> {
    let (table, rest) = container::parse::<S>(data)?;
    let padded = bits::from_bytes(rest);
    let payload = bits::unpad(&padded)?;
    let symbols = bits::decode(&payload, &table)?;

    debug!(
        "decompressed {} bytes ({} codes, {} payload bits) into {} symbols",
        data.len(),
        table.len(),
        payload.len(),
        symbols.len()
    );
    Ok(symbols)
}

/// Compress the characters of `text`.
///
/// # Example
///
/// ```
/// use huffpack::compression::huffman::{compress_str, decompress_str};
///
/// let packed = compress_str("naïve café").unwrap();
/// assert_eq!(decompress_str(&packed).unwrap(), "naïve café");
/// ```
pub fn compress_str(text: &str) -> Result<Vec<u8>> {
    let chars: Vec<char> = text.chars().collect();
    compress(&chars)
}

/// Decompress a container produced by [`compress_str`].
pub fn decompress_str(data: &[u8]) -> Result<String> {
    decompress::<char>(data).map(|chars| chars.into_iter().collect())
}

/// Size and code-length figures for compressing one input.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionStats {
    /// Symbols in the input.
    pub symbols: usize,
    /// Distinct symbols, i.e. leaves in the tree.
    pub distinct: usize,
    /// Encoded payload length before padding.
    pub payload_bits: usize,
    /// Longest code in the table.
    pub max_code_len: usize,
    /// Weighted mean code length in bits per symbol.
    pub average_code_len: f64,
    /// Bits per symbol a fixed-width code over the same alphabet needs.
    pub fixed_width_bits: u32,
    /// Size of the whole container, table included.
    pub container_bytes: usize,
}

impl CompressionStats {
    /// Payload size relative to a fixed-width encoding of the same input.
    pub fn ratio(&self) -> f64 {
        let fixed = self.symbols as f64 * f64::from(self.fixed_width_bits);
        self.payload_bits as f64 / fixed
    }
}

/// Compress `input` and report how well the code fits it.
pub fn analyze<S: Symbol>(input: &[S]) -> Result<CompressionStats> {
    let encoded = encode_container(input)?;
    let distinct = encoded.freq.len();
    let fixed_width_bits = if distinct <= 1 {
        1
    } else {
        usize::BITS - (distinct - 1).leading_zeros()
    };

    Ok(CompressionStats {
        symbols: input.len(),
        distinct,
        payload_bits: encoded.payload_bits,
        max_code_len: encoded.table.max_code_len(),
        average_code_len: encoded.table.average_code_len(&encoded.freq),
        fixed_width_bits,
        container_bytes: encoded.container.len(),
    })
}

/// Byte-oriented Huffman codec for use through the [`Compression`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl Compression for HuffmanCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        compress(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        decompress(data)
    }
}
