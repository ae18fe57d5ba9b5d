//! Bit-level encoding, padding and byte packing.
//!
//! A padded stream has the layout
//!
//! ```text
//! 0000_0000 1111_1111 <padding count> <payload bits> <padding zeros>
//! ```
//!
//! The padding count is always between 1 and 8: a payload that is already
//! byte aligned still receives a full byte of zeros. The first two bytes are
//! the sentinel that separates the code table from the payload inside a
//! container; [`unpad`] expects them to have been consumed already.

use bitvec::prelude::*;

use super::codes::{Code, CodeTable};
use super::Symbol;
use crate::error::{Error, Result};

/// Delimiter between the code table and the padded payload.
pub const SENTINEL: [u8; 2] = [0x00, 0xFF];

/// Concatenate the code of each symbol in input order.
pub fn encode<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<BitVec<u8, Msb0>> {
    let mut bits = BitVec::new();
    for &symbol in symbols {
        let code = table
            .code(symbol)
            .ok_or_else(|| Error::MissingCode(format!("{:?}", symbol)))?;
        bits.extend_from_bitslice(code);
    }
    Ok(bits)
}

/// Prepend the sentinel and padding count, then append the padding zeros.
///
/// The result is always a positive multiple of 8 bits long.
///
/// # Example
///
/// ```
/// use bitvec::prelude::*;
/// use huffpack::compression::huffman::bits::pad;
///
/// let padded = pad(bits![u8, Msb0; 1, 0, 1]);
/// assert_eq!(padded.len(), 32);
/// assert_eq!(padded.as_raw_slice(), &[0x00, 0xFF, 5, 0b1010_0000]);
/// ```
pub fn pad(bits: &BitSlice<u8, Msb0>) -> BitVec<u8, Msb0> {
    let extra = 8 - bits.len() % 8;
    let header = [SENTINEL[0], SENTINEL[1], extra as u8];

    let mut padded = BitVec::with_capacity(header.len() * 8 + bits.len() + extra);
    padded.extend_from_bitslice(header.view_bits::<Msb0>());
    padded.extend_from_bitslice(bits);
    padded.resize(padded.len() + extra, false);
    padded
}

/// Group bits into bytes, first bit as the most significant.
pub fn to_bytes(bits: &BitSlice<u8, Msb0>) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(Error::UnalignedPayload(bits.len()));
    }
    Ok(bits.chunks_exact(8).map(byte_value).collect())
}

/// Expand bytes back into bits, most significant first.
pub fn from_bytes(bytes: &[u8]) -> BitVec<u8, Msb0> {
    BitVec::from_slice(bytes)
}

/// Read the leading padding count and strip it along with the trailing
/// padding zeros.
pub fn unpad(bits: &BitSlice<u8, Msb0>) -> Result<BitVec<u8, Msb0>> {
    if bits.len() < 8 {
        return Err(Error::malformed("missing padding count"));
    }
    let extra = byte_value(&bits[..8]) as usize;
    let body = &bits[8..];

    if !(1..=8).contains(&extra) {
        return Err(Error::malformed(format!("invalid padding count {}", extra)));
    }
    if extra > body.len() {
        return Err(Error::malformed(format!(
            "padding count {} exceeds the {} payload bits",
            extra,
            body.len()
        )));
    }

    let (payload, padding) = body.split_at(body.len() - extra);
    if padding.any() {
        return Err(Error::malformed("padding bits are not zero"));
    }
    Ok(payload.to_bitvec())
}

/// Decode a payload by accumulating bits until they match a code.
///
/// Fails with [`Error::CorruptCode`] when the accumulated bits grow past the
/// longest code without a match, or when bits are left over at the end.
pub fn decode<S: Symbol>(bits: &BitSlice<u8, Msb0>, table: &CodeTable<S>) -> Result<Vec<S>> {
    let max_len = table.max_code_len();
    let mut symbols = Vec::new();
    let mut current = Code::with_capacity(max_len);
    let mut start = 0;

    for (offset, bit) in bits.iter().by_vals().enumerate() {
        current.push(bit);
        if let Some(symbol) = table.symbol(&current) {
            symbols.push(symbol);
            current.clear();
            start = offset + 1;
        } else if current.len() >= max_len {
            return Err(Error::CorruptCode { offset: start });
        }
    }

    if !current.is_empty() {
        return Err(Error::CorruptCode { offset: start });
    }
    Ok(symbols)
}

fn byte_value(chunk: &BitSlice<u8, Msb0>) -> u8 {
    chunk
        .iter()
        .by_vals()
        .fold(0u8, |byte, bit| (byte << 1) | bit as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;
    use crate::compression::huffman::codes::assign_codes;
    use crate::compression::huffman::frequency::FrequencyTable;
    use crate::compression::huffman::tree::build_tree;

    fn table_for(input: &[u8]) -> CodeTable<u8> {
        assign_codes(&build_tree(&FrequencyTable::from_symbols(input)).unwrap())
    }

    #[test]
    fn test_encode_concatenates_codes() {
        // a=0, c=10, b=11
        let table = table_for(b"aaabbc");
        let bits = encode(b"abca", &table).unwrap();
        assert_eq!(bits, bitvec![u8, Msb0; 0, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_encode_missing_symbol() {
        let table = table_for(b"aaabbc");
        assert_eq!(
            encode(b"abz", &table),
            Err(Error::MissingCode("122".to_string()))
        );
    }

    #[test]
    fn test_pad_lengths() {
        for len in 0..40 {
            let bits = bitvec![u8, Msb0; 1; len];
            let padded = pad(&bits);
            let extra = 8 - len % 8;
            assert_eq!(padded.len() % 8, 0);
            assert_eq!(padded.len(), 24 + len + extra);
            assert_eq!(byte_value(&padded[16..24]) as usize, extra);
            assert!((1..=8).contains(&extra));
            assert!(padded[24 + len..].not_any());
        }
    }

    #[test]
    fn test_pad_aligned_adds_full_byte() {
        let bits = bitvec![u8, Msb0; 1; 16];
        let bytes = to_bytes(&pad(&bits)).unwrap();
        assert_eq!(bytes, vec![0x00, 0xFF, 8, 0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn test_to_bytes_unaligned() {
        let bits = bitvec![u8, Msb0; 1; 13];
        assert_eq!(to_bytes(&bits), Err(Error::UnalignedPayload(13)));
    }

    #[test]
    fn test_to_bytes_msb_first() {
        let bits = bitvec![u8, Msb0; 1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        assert_eq!(to_bytes(&bits).unwrap(), vec![0x81, 0x55]);
        // Slices that do not start on a byte boundary pack the same way.
        let mut shifted = bitvec![u8, Msb0; 0; 3];
        shifted.extend_from_bitslice(&bits);
        assert_eq!(to_bytes(&shifted[3..]).unwrap(), vec![0x81, 0x55]);
    }

    #[test]
    fn test_unpad_inverts_pad() {
        let bits = bitvec![u8, Msb0; 1, 0, 1, 1, 0];
        let padded = pad(&bits);
        // The sentinel belongs to the container and is consumed before unpad.
        let unpadded = unpad(&padded[16..]).unwrap();
        assert_eq!(unpadded, bits);
    }

    #[test]
    fn test_unpad_rejects_bad_counts() {
        assert!(matches!(
            unpad(&from_bytes(&[])),
            Err(Error::MalformedContainer(_))
        ));
        assert!(matches!(
            unpad(&from_bytes(&[0, 0xAA])),
            Err(Error::MalformedContainer(_))
        ));
        assert!(matches!(
            unpad(&from_bytes(&[9, 0x00, 0x00])),
            Err(Error::MalformedContainer(_))
        ));
        assert!(matches!(
            unpad(&from_bytes(&[8])),
            Err(Error::MalformedContainer(_))
        ));
        assert!(matches!(
            unpad(&from_bytes(&[2, 0b0000_0011])),
            Err(Error::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_decode_greedy() {
        let table = table_for(b"aaabbc");
        let bits = bitvec![u8, Msb0; 0, 1, 1, 1, 0, 0];
        assert_eq!(decode(&bits, &table).unwrap(), b"abca");
    }

    #[test]
    fn test_decode_trailing_bits() {
        let table = table_for(b"aaabbc");
        let bits = bitvec![u8, Msb0; 0, 1];
        assert_eq!(
            decode(&bits, &table),
            Err(Error::CorruptCode { offset: 1 })
        );
    }

    #[test]
    fn test_decode_single_symbol_rejects_one_bits() {
        let table = table_for(b"zzz");
        let bits = bitvec![u8, Msb0; 0, 0, 1];
        assert_eq!(
            decode(&bits, &table),
            Err(Error::CorruptCode { offset: 2 })
        );
    }
}
