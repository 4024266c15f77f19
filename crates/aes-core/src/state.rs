//! The 4x4 byte matrix the round transformations operate on.

use crate::block::{Block, Word, BLOCK_SIZE};

/// One block as a 4x4 matrix, stored by row.
///
/// Byte `i` of the flat block lives at `rows[i % 4][i / 4]`, so each column
/// holds four consecutive input bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct State {
    rows: [[u8; 4]; 4],
}

impl State {
    /// Lays a flat block out column by column.
    pub fn from_block(block: &Block) -> Self {
        let mut rows = [[0u8; 4]; 4];
        for (i, &byte) in block.iter().enumerate() {
            rows[i % 4][i / 4] = byte;
        }
        Self { rows }
    }

    /// Flattens the matrix back into a block, column by column.
    pub fn to_block(&self) -> Block {
        let mut block = [0u8; BLOCK_SIZE];
        for (i, byte) in block.iter_mut().enumerate() {
            *byte = self.rows[i % 4][i / 4];
        }
        block
    }

    /// Returns column `col` as a word.
    #[inline]
    pub fn column(&self, col: usize) -> Word {
        [
            self.rows[0][col],
            self.rows[1][col],
            self.rows[2][col],
            self.rows[3][col],
        ]
    }

    /// Overwrites column `col`.
    #[inline]
    pub fn set_column(&mut self, col: usize, word: Word) {
        for (row, byte) in self.rows.iter_mut().zip(word) {
            row[col] = byte;
        }
    }

    /// Row-major view of the matrix.
    #[inline]
    pub fn rows(&self) -> &[[u8; 4]; 4] {
        &self.rows
    }

    /// Mutable row-major view of the matrix.
    #[inline]
    pub fn rows_mut(&mut self) -> &mut [[u8; 4]; 4] {
        &mut self.rows
    }

    /// Iterates over every byte of the state.
    pub fn bytes_mut(&mut self) -> impl Iterator<Item = &mut u8> {
        self.rows.iter_mut().flatten()
    }
}

impl From<Block> for State {
    fn from(block: Block) -> Self {
        Self::from_block(&block)
    }
}

impl From<State> for Block {
    fn from(state: State) -> Self {
        state.to_block()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTING: Block = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    #[test]
    fn block_is_laid_out_column_major() {
        let state = State::from_block(&COUNTING);
        assert_eq!(state.rows()[0], [0, 4, 8, 12]);
        assert_eq!(state.rows()[3], [3, 7, 11, 15]);
        assert_eq!(state.column(1), [4, 5, 6, 7]);
    }

    #[test]
    fn block_survives_conversion() {
        assert_eq!(State::from_block(&COUNTING).to_block(), COUNTING);
    }

    #[test]
    fn set_column_only_touches_that_column() {
        let mut state = State::from_block(&COUNTING);
        state.set_column(2, [0xaa, 0xbb, 0xcc, 0xdd]);
        let block = state.to_block();
        assert_eq!(&block[8..12], &[0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(&block[..8], &COUNTING[..8]);
        assert_eq!(&block[12..], &COUNTING[12..]);
    }
}
