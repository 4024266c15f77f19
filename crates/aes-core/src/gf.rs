//! Arithmetic in GF(2^8) modulo `x^8 + x^4 + x^3 + x + 1`.

/// Low byte of the AES reduction polynomial.
pub const REDUCTION: u8 = 0x1b;

/// Multiplies `byte` by `x` (i.e. `{02}`).
#[inline]
pub fn xtime(byte: u8) -> u8 {
    let shifted = byte << 1;
    if byte & 0x80 != 0 {
        shifted ^ REDUCTION
    } else {
        shifted
    }
}

/// Carry-less shift-and-reduce multiplication of two field elements.
pub fn multiply(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    for _ in 0..8 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}
