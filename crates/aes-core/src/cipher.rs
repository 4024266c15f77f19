//! AES-128 key schedule and block encryption/decryption.

use rand::Rng;

use crate::block::{xor_words, Block, Word};
use crate::key::{Aes128Key, RoundKeys, ROUND_KEY_COUNT};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::sbox::{sbox, RCON};
use crate::state::State;

/// Number of cipher rounds for a 128-bit key.
pub const ROUNDS: usize = 10;

const SCHEDULE_WORDS: usize = 4 * ROUND_KEY_COUNT;

fn rot_word(mut word: Word) -> Word {
    word.rotate_left(1);
    word
}

fn sub_word(word: Word) -> Word {
    word.map(sbox)
}

/// Expands a 128-bit key into 11 round keys.
pub fn expand_key(key: &Aes128Key) -> RoundKeys {
    let key_state = key.to_state();
    let mut w = [[0u8; 4]; SCHEDULE_WORDS];
    for (col, word) in w.iter_mut().take(4).enumerate() {
        *word = key_state.column(col);
    }

    for n in 4..SCHEDULE_WORDS {
        let mut temp = w[n - 1];
        if n % 4 == 0 {
            temp = sub_word(rot_word(temp));
            temp[0] ^= RCON[n / 4 - 1];
        }
        w[n] = xor_words(&w[n - 4], &temp);
    }

    let mut round_keys = [State::default(); ROUND_KEY_COUNT];
    for (round, round_key) in round_keys.iter_mut().enumerate() {
        for col in 0..4 {
            round_key.set_column(col, w[round * 4 + col]);
        }
    }

    RoundKeys::new(round_keys)
}

/// Encrypts one state in place with pre-expanded round keys.
pub fn encrypt_state(state: &mut State, round_keys: &RoundKeys) {
    add_round_key(state, round_keys.get(0));

    for round in 1..=ROUNDS {
        sub_bytes(state);
        shift_rows(state);
        if round != ROUNDS {
            mix_columns(state);
        }
        add_round_key(state, round_keys.get(round));
    }
}

/// Decrypts one state in place with pre-expanded round keys.
pub fn decrypt_state(state: &mut State, round_keys: &RoundKeys) {
    add_round_key(state, round_keys.get(ROUNDS));
    for round in (1..ROUNDS).rev() {
        inv_shift_rows(state);
        inv_sub_bytes(state);
        add_round_key(state, round_keys.get(round));
        inv_mix_columns(state);
    }
    inv_shift_rows(state);
    inv_sub_bytes(state);
    add_round_key(state, round_keys.get(0));
}

/// Encrypts a single 16-byte block in place.
pub fn encrypt_block(block: &mut Block, round_keys: &RoundKeys) {
    let mut state = State::from_block(block);
    encrypt_state(&mut state, round_keys);
    *block = state.to_block();
}

/// Decrypts a single 16-byte block in place.
pub fn decrypt_block(block: &mut Block, round_keys: &RoundKeys) {
    let mut state = State::from_block(block);
    decrypt_state(&mut state, round_keys);
    *block = state.to_block();
}

/// A key bound to its expanded schedule.
///
/// Holds no per-block state, so one instance can serve any number of blocks,
/// streams or threads.
#[derive(Clone, Debug)]
pub struct Aes128 {
    key: Aes128Key,
    round_keys: RoundKeys,
}

impl Aes128 {
    /// Expands `key` and binds it to the new instance.
    pub fn new(key: Aes128Key) -> Self {
        Self {
            round_keys: expand_key(&key),
            key,
        }
    }

    /// Builds an instance around a freshly generated printable key.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Aes128Key::generate_printable(rng))
    }

    /// The cipher key.
    pub fn key(&self) -> &Aes128Key {
        &self.key
    }

    /// The expanded schedule.
    pub fn round_keys(&self) -> &RoundKeys {
        &self.round_keys
    }

    /// Replaces the key and regenerates the whole schedule.
    pub fn rekey(&mut self, key: Aes128Key) {
        tracing::trace!("regenerating AES-128 key schedule");
        *self = Self::new(key);
    }

    /// Encrypts one block in place.
    #[inline]
    pub fn encrypt_block(&self, block: &mut Block) {
        encrypt_block(block, &self.round_keys);
    }

    /// Decrypts one block in place.
    #[inline]
    pub fn decrypt_block(&self, block: &mut Block) {
        decrypt_block(block, &self.round_keys);
    }
}

impl From<Aes128Key> for Aes128 {
    fn from(key: Aes128Key) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Aes128Key;
    use proptest::prelude::*;
    use rand::RngCore;

    const NIST_KEY: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const NIST_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    const NIST_CIPHER: [u8; 16] = [
        0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5,
        0x5a,
    ];

    const APPENDIX_B_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];
    const APPENDIX_B_PLAIN: [u8; 16] = [
        0x32, 0x43, 0xf6, 0xa8, 0x88, 0x5a, 0x30, 0x8d, 0x31, 0x31, 0x98, 0xa2, 0xe0, 0x37, 0x07,
        0x34,
    ];
    const APPENDIX_B_CIPHER: [u8; 16] = [
        0x39, 0x25, 0x84, 0x1d, 0x02, 0xdc, 0x09, 0xfb, 0xdc, 0x11, 0x85, 0x97, 0x19, 0x6a, 0x0b,
        0x32,
    ];

    #[test]
    fn encrypt_matches_nist_vector() {
        let round_keys = expand_key(&Aes128Key::from(NIST_KEY));
        let mut block = NIST_PLAIN;
        encrypt_block(&mut block, &round_keys);
        assert_eq!(block, NIST_CIPHER);
    }

    #[test]
    fn decrypt_matches_nist_vector() {
        let round_keys = expand_key(&Aes128Key::from(NIST_KEY));
        let mut block = NIST_CIPHER;
        decrypt_block(&mut block, &round_keys);
        assert_eq!(block, NIST_PLAIN);
    }

    #[test]
    fn appendix_b_vector() {
        let cipher = Aes128::new(Aes128Key::from(APPENDIX_B_KEY));
        let mut block = APPENDIX_B_PLAIN;
        cipher.encrypt_block(&mut block);
        assert_eq!(block, APPENDIX_B_CIPHER);
        cipher.decrypt_block(&mut block);
        assert_eq!(block, APPENDIX_B_PLAIN);
    }

    #[test]
    fn key_expansion_matches_appendix_a() {
        let round_keys = expand_key(&Aes128Key::from(APPENDIX_B_KEY));
        assert_eq!(round_keys.get(0).to_block(), APPENDIX_B_KEY);
        // w[4..8]
        assert_eq!(
            round_keys.get(1).to_block(),
            [
                0xa0, 0xfa, 0xfe, 0x17, 0x88, 0x54, 0x2c, 0xb1, 0x23, 0xa3, 0x39, 0x39, 0x2a, 0x6c,
                0x76, 0x05,
            ]
        );
        // w[40..44]
        assert_eq!(
            round_keys.get(10).to_block(),
            [
                0xd0, 0x14, 0xf9, 0xa8, 0xc9, 0xee, 0x25, 0x89, 0xe1, 0x3f, 0x0c, 0xc8, 0xb6, 0x63,
                0x0c, 0xa6,
            ]
        );
    }

    #[test]
    fn key_expansion_is_deterministic() {
        let key = Aes128Key::from(APPENDIX_B_KEY);
        assert_eq!(expand_key(&key), expand_key(&key));
    }

    #[test]
    fn distinct_keys_give_distinct_round_keys() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let mut a = [0u8; 16];
            let mut b = [0u8; 16];
            rng.fill_bytes(&mut a);
            rng.fill_bytes(&mut b);
            if a == b {
                continue;
            }
            let ka = expand_key(&Aes128Key::from(a));
            let kb = expand_key(&Aes128Key::from(b));
            for round in 1..ROUND_KEY_COUNT {
                assert_ne!(ka.get(round), kb.get(round));
            }
        }
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut key_bytes = [0u8; 16];
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            rng.fill_bytes(&mut block);
            let rks = expand_key(&Aes128Key::from(key_bytes));
            let mut data = block;
            encrypt_block(&mut data, &rks);
            decrypt_block(&mut data, &rks);
            assert_eq!(data, block);
        }
    }

    #[test]
    fn rekey_replaces_schedule() {
        let mut cipher = Aes128::new(Aes128Key::from(NIST_KEY));
        cipher.rekey(Aes128Key::from(APPENDIX_B_KEY));
        assert_eq!(cipher.key(), &Aes128Key::from(APPENDIX_B_KEY));
        assert_eq!(
            cipher.round_keys(),
            &expand_key(&Aes128Key::from(APPENDIX_B_KEY))
        );
        let mut block = APPENDIX_B_PLAIN;
        cipher.encrypt_block(&mut block);
        assert_eq!(block, APPENDIX_B_CIPHER);
    }

    #[test]
    fn shared_across_threads() {
        let cipher = Aes128::new(Aes128Key::from(APPENDIX_B_KEY));
        let blocks: Vec<Block> = (0..8u8).map(|i| [i; 16]).collect();
        let encrypted: Vec<Block> = std::thread::scope(|scope| {
            let handles: Vec<_> = blocks
                .iter()
                .map(|block| {
                    let cipher = &cipher;
                    scope.spawn(move || {
                        let mut out = *block;
                        cipher.encrypt_block(&mut out);
                        out
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("worker panicked"))
                .collect()
        });
        for (plain, cipher_text) in blocks.iter().zip(&encrypted) {
            let mut expected = *plain;
            cipher.encrypt_block(&mut expected);
            assert_eq!(&expected, cipher_text);
        }
    }

    proptest! {
        #[test]
        fn round_trip_any_key_and_block(key: [u8; 16], block: [u8; 16]) {
            let cipher = Aes128::new(Aes128Key::from(key));
            let mut data = block;
            cipher.encrypt_block(&mut data);
            cipher.decrypt_block(&mut data);
            prop_assert_eq!(data, block);
        }
    }
}
