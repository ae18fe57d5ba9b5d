//! Compression algorithms.
//!
//! Currently implemented:
//! - Huffman coding with an embedded code table
//!
//! # Examples
//!
//! ```rust
//! use huffpack::compression::{Compression, HuffmanCodec};
//!
//! let codec = HuffmanCodec;
//! let packed = codec.compress(b"abracadabra").unwrap();
//! assert_eq!(codec.decompress(&packed).unwrap(), b"abracadabra");
//! ```

use crate::error::Error;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod huffman;
pub use huffman::{
    analyze, compress, compress_str, decompress, decompress_str, CodeTable, CompressionStats,
    FrequencyTable, HuffmanCodec, HuffmanNode, Symbol,
};
