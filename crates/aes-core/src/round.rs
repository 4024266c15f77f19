//! AES round transformations.

use crate::block::xor_words;
use crate::gf::{multiply, xtime};
use crate::sbox::{inv_sbox, sbox};
use crate::state::State;

/// MixColumns coefficients, one row per output byte.
pub const MIX_COLUMNS_MATRIX: [[u8; 4]; 4] = [
    [0x02, 0x03, 0x01, 0x01],
    [0x01, 0x02, 0x03, 0x01],
    [0x01, 0x01, 0x02, 0x03],
    [0x03, 0x01, 0x01, 0x02],
];

/// Inverse MixColumns coefficients.
pub const INV_MIX_COLUMNS_MATRIX: [[u8; 4]; 4] = [
    [0x0e, 0x0b, 0x0d, 0x09],
    [0x09, 0x0e, 0x0b, 0x0d],
    [0x0d, 0x09, 0x0e, 0x0b],
    [0x0b, 0x0d, 0x09, 0x0e],
];

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut State) {
    for byte in state.bytes_mut() {
        *byte = sbox(*byte);
    }
}

/// Applies the inverse SubBytes transformation.
#[inline]
pub fn inv_sub_bytes(state: &mut State) {
    for byte in state.bytes_mut() {
        *byte = inv_sbox(*byte);
    }
}

/// Rotates row `i` left by `i` positions.
#[inline]
pub fn shift_rows(state: &mut State) {
    for (i, row) in state.rows_mut().iter_mut().enumerate() {
        row.rotate_left(i);
    }
}

/// Rotates row `i` right by `i` positions.
#[inline]
pub fn inv_shift_rows(state: &mut State) {
    for (i, row) in state.rows_mut().iter_mut().enumerate() {
        row.rotate_right(i);
    }
}

fn mix_single_column(col: [u8; 4]) -> [u8; 4] {
    let [a0, a1, a2, a3] = col;
    [
        xtime(a0) ^ (xtime(a1) ^ a1) ^ a2 ^ a3,
        a0 ^ xtime(a1) ^ (xtime(a2) ^ a2) ^ a3,
        a0 ^ a1 ^ xtime(a2) ^ (xtime(a3) ^ a3),
        (xtime(a0) ^ a0) ^ a1 ^ a2 ^ xtime(a3),
    ]
}

fn matrix_times_column(matrix: &[[u8; 4]; 4], col: [u8; 4]) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (out_byte, coefficients) in out.iter_mut().zip(matrix) {
        *out_byte = coefficients
            .iter()
            .zip(col)
            .fold(0, |acc, (&c, byte)| acc ^ multiply(c, byte));
    }
    out
}

/// MixColumns over all four columns.
#[inline]
pub fn mix_columns(state: &mut State) {
    for col in 0..4 {
        let mixed = mix_single_column(state.column(col));
        state.set_column(col, mixed);
    }
}

/// Inverse MixColumns over all four columns.
#[inline]
pub fn inv_mix_columns(state: &mut State) {
    for col in 0..4 {
        let mixed = matrix_times_column(&INV_MIX_COLUMNS_MATRIX, state.column(col));
        state.set_column(col, mixed);
    }
}

/// Adds (XORs) a round key into the state. Its own inverse.
#[inline]
pub fn add_round_key(state: &mut State, round_key: &State) {
    for col in 0..4 {
        let mixed = xor_words(&state.column(col), &round_key.column(col));
        state.set_column(col, mixed);
    }
}
