//! Self-describing container holding the code table and the packed payload.
//!
//! ```text
//! "HUF" | version | symbol kind | count (u32 LE)
//!       | count x { symbol | code length (u8) | code bytes, MSB first }
//!       | 0x00 0xFF | padding count | payload bytes
//! ```
//!
//! The table section is length-prefixed, so the sentinel is looked for at
//! the exact offset where the table ends. Bytes inside the table that
//! happen to read `0x00 0xFF` are never taken for the delimiter.

use super::bits::{from_bytes, to_bytes, SENTINEL};
use super::codes::CodeTable;
use super::Symbol;
use crate::error::{Error, Result};

pub const MAGIC: [u8; 3] = *b"HUF";
pub const VERSION: u8 = 1;

/// Longest code the one-byte length field can describe.
pub const MAX_CODE_LEN: usize = u8::MAX as usize;

/// Write the container for `table` followed by the padded payload.
///
/// `padded` is the byte form of a [`pad`](super::bits::pad)ded stream and so
/// starts with the sentinel.
pub fn serialize<S: Symbol>(table: &CodeTable<S>, padded: &[u8]) -> Result<Vec<u8>> {
    if !padded.starts_with(&SENTINEL) {
        return Err(Error::malformed("padded payload does not start with the sentinel"));
    }

    let mut out = Vec::with_capacity(MAGIC.len() + 6 + table.len() * (S::WIDTH + 2) + padded.len());
    out.extend_from_slice(&MAGIC);
    out.push(VERSION);
    out.push(S::KIND);
    write_table(table, &mut out)?;
    out.extend_from_slice(padded);
    Ok(out)
}

fn write_table<S: Symbol>(table: &CodeTable<S>, out: &mut Vec<u8>) -> Result<()> {
    let count = u32::try_from(table.len())
        .map_err(|_| Error::malformed("code table has too many entries"))?;
    out.extend_from_slice(&count.to_le_bytes());

    for (symbol, code) in table.iter() {
        if code.len() > MAX_CODE_LEN {
            return Err(Error::CodeTooLong(code.len()));
        }
        symbol.write_to(out);
        out.push(code.len() as u8);

        let mut filled = code.to_bitvec();
        filled.resize(code.len().div_ceil(8) * 8, false);
        out.extend(to_bytes(&filled)?);
    }
    Ok(())
}

/// Split a container into its code table and the bytes after the sentinel
/// (padding count followed by the payload).
pub fn parse<S: Symbol>(data: &[u8]) -> Result<(CodeTable<S>, &[u8])> {
    let mut reader = Reader { rest: data };

    if reader.take(MAGIC.len(), "magic")? != MAGIC {
        return Err(Error::malformed("bad magic"));
    }
    let version = reader.byte("version")?;
    if version != VERSION {
        return Err(Error::malformed(format!("unsupported version {}", version)));
    }
    let kind = reader.byte("symbol kind")?;
    if kind != S::KIND {
        return Err(Error::malformed(format!(
            "symbol kind {} does not match the requested kind {}",
            kind,
            S::KIND
        )));
    }

    let count = u32::from_le_bytes(
        reader
            .take(4, "symbol count")?
            .try_into()
            .map_err(|_| Error::malformed("truncated symbol count"))?,
    ) as usize;

    let mut entries = Vec::with_capacity(count.min(reader.rest.len()));
    for _ in 0..count {
        let symbol = S::read_from(reader.take(S::WIDTH, "symbol")?)
            .ok_or_else(|| Error::malformed("invalid symbol in code table"))?;
        let len = reader.byte("code length")? as usize;
        let raw = reader.take(len.div_ceil(8), "code bits")?;
        let code = from_bytes(raw)[..len].to_bitvec();
        entries.push((symbol, code));
    }

    if reader.take(SENTINEL.len(), "sentinel")? != SENTINEL {
        return Err(Error::malformed("sentinel not found after code table"));
    }

    let table = CodeTable::from_entries(entries)?;
    Ok((table, reader.rest))
}

struct Reader<'a> {
    rest: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.rest.len() < n {
            return Err(Error::malformed(format!("truncated {}", what)));
        }
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        Ok(head)
    }

    fn byte(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }
}
