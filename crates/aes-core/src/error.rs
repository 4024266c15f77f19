//! Error type shared by the key constructors and the stream codec.

use thiserror::Error;

/// Failures reported by this crate. All of them are terminal for the
/// operation that raised them.
#[derive(Debug, Error)]
pub enum Error {
    /// A key was not exactly 16 bytes long.
    #[error("AES-128 key must be 16 bytes, got {actual}")]
    KeyLength {
        /// Length of the rejected key in bytes.
        actual: usize,
    },

    /// The final decrypted block does not end in valid PKCS#7 padding.
    #[error("invalid PKCS#7 padding (final byte {value:#04x})")]
    Padding {
        /// Last byte of the final decrypted block.
        value: u8,
    },

    /// Ciphertext length is not a positive multiple of the block size.
    #[error("ciphertext length {len} is not a positive multiple of 16 bytes")]
    TruncatedStream {
        /// Number of ciphertext bytes received.
        len: u64,
    },

    /// Reading the input or writing the output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
