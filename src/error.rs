use thiserror::Error;

/// Errors produced while compressing or decompressing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// There were no symbols to compress.
    #[error("cannot compress empty input")]
    EmptyInput,

    /// A bit stream handed to byte packing was not a whole number of bytes.
    #[error("payload of {0} bits is not byte aligned")]
    UnalignedPayload(usize),

    /// The container could not be parsed.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// The payload contained a bit sequence that matches no code.
    #[error("no code matches the bits starting at offset {offset}")]
    CorruptCode { offset: usize },

    /// A symbol being encoded has no entry in the code table.
    #[error("no code for symbol {0}")]
    MissingCode(String),

    /// A code is too long to be stored in the table section.
    #[error("code of {0} bits exceeds the 255-bit table limit")]
    CodeTooLong(usize),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedContainer(msg.into())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
