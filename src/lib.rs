//! Huffman compression with a self-describing container format.
//!
//! ```rust
//! let packed = huffpack::compress(b"mississippi").unwrap();
//! let unpacked: Vec<u8> = huffpack::decompress(&packed).unwrap();
//! assert_eq!(unpacked, b"mississippi");
//! ```

pub mod compression;
pub mod error;

pub use compression::huffman::{compress, compress_str, decompress, decompress_str};
pub use error::{Error, Result};
