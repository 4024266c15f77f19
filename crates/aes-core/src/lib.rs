//! AES-128 block cipher (FIPS-197) with a padded block-stream codec.
//!
//! This crate mirrors the FIPS-197 specification and provides:
//! - GF(2^8) arithmetic, the S-boxes and the round constants.
//! - Key schedule for AES-128.
//! - Single-block encryption and decryption, in place.
//! - Stream encryption and decryption with PKCS#7 padding, one block at a time.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened. Streams are
//! processed in ECB fashion, so equal plaintext blocks leak as equal ciphertext
//! blocks.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
pub mod gf;
mod key;
pub mod round;
pub mod sbox;
mod state;
pub mod stream;

pub use crate::block::{Block, Word, BLOCK_SIZE};
pub use crate::cipher::{
    decrypt_block, decrypt_state, encrypt_block, encrypt_state, expand_key, Aes128, ROUNDS,
};
pub use crate::error::{Error, Result};
pub use crate::key::{Aes128Key, RoundKeys, PRINTABLE_KEY_CHARS, ROUND_KEY_COUNT};
pub use crate::state::State;
pub use crate::stream::{
    decrypt_reader, decrypt_stream, encrypt_reader, encrypt_stream, StreamDecryptor,
    StreamEncryptor,
};
