//! Key types for AES-128.

use rand::Rng;

use crate::block::{Block, BLOCK_SIZE};
use crate::error::{Error, Result};
use crate::state::State;

/// Number of round keys produced by the AES-128 key schedule.
pub const ROUND_KEY_COUNT: usize = 11;

/// Characters the convenience key generator draws from: printable ASCII
/// without the space.
pub const PRINTABLE_KEY_CHARS: core::ops::RangeInclusive<u8> = b'!'..=b'~';

/// AES-128 key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aes128Key(pub Block);

impl Aes128Key {
    /// Takes the bytes of a 16-byte string as the key.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::try_from(text.as_bytes())
    }

    /// Generates a key of 16 characters drawn uniformly from
    /// [`PRINTABLE_KEY_CHARS`].
    ///
    /// Convenient for keys that have to be typed back in, but the key space
    /// is far smaller than 2^128. Use [`Aes128Key::from`] with random bytes
    /// when strength matters.
    pub fn generate_printable<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut key = [0u8; BLOCK_SIZE];
        for byte in key.iter_mut() {
            *byte = rng.gen_range(PRINTABLE_KEY_CHARS);
        }
        Self(key)
    }

    /// Raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &Block {
        &self.0
    }

    /// The key as a 4x4 matrix.
    #[inline]
    pub fn to_state(&self) -> State {
        State::from_block(&self.0)
    }
}

impl From<[u8; 16]> for Aes128Key {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Aes128Key {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let key: Block = bytes
            .try_into()
            .map_err(|_| Error::KeyLength {
                actual: bytes.len(),
            })?;
        Ok(Self(key))
    }
}

/// Expanded round keys for AES-128. Index 0 is the cipher key itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys([State; ROUND_KEY_COUNT]);

impl RoundKeys {
    pub(crate) fn new(keys: [State; ROUND_KEY_COUNT]) -> Self {
        Self(keys)
    }

    /// Returns the round key at the requested index (0..=10).
    #[inline]
    pub fn get(&self, round: usize) -> &State {
        &self.0[round]
    }

    /// Round keys in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn rejects_wrong_lengths() {
        for len in [0usize, 15, 17, 32] {
            let bytes = vec![0u8; len];
            match Aes128Key::try_from(bytes.as_slice()) {
                Err(Error::KeyLength { actual }) => assert_eq!(actual, len),
                other => panic!("unexpected result for {len} bytes: {other:?}"),
            }
        }
    }

    #[test]
    fn text_key_is_taken_byte_for_byte() {
        let key = Aes128Key::from_text("Thats my Kung Fu").unwrap();
        assert_eq!(key.as_bytes(), b"Thats my Kung Fu");
        assert!(Aes128Key::from_text("too short").is_err());
    }

    #[test]
    fn printable_keys_stay_in_alphabet() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..200 {
            let key = Aes128Key::generate_printable(&mut rng);
            assert!(key.as_bytes().iter().all(|b| PRINTABLE_KEY_CHARS.contains(b)));
        }
    }

    #[test]
    fn printable_keys_differ() {
        let mut rng = rand::thread_rng();
        let first = Aes128Key::generate_printable(&mut rng);
        let second = Aes128Key::generate_printable(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = Aes128Key::generate_printable(&mut ChaCha20Rng::seed_from_u64(42));
        let second = Aes128Key::generate_printable(&mut ChaCha20Rng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
