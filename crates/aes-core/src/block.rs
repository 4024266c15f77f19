//! Block and word representation helpers.

/// Size of one AES block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes.
pub type Block = [u8; BLOCK_SIZE];

/// Four bytes; one column of the state and the unit of the key schedule.
pub type Word = [u8; 4];

/// XORs two words.
#[inline]
pub fn xor_words(lhs: &Word, rhs: &Word) -> Word {
    [lhs[0] ^ rhs[0], lhs[1] ^ rhs[1], lhs[2] ^ rhs[2], lhs[3] ^ rhs[3]]
}
