//! Block-by-block processing of byte streams with PKCS#7 padding.
//!
//! Every block is encrypted independently under the same key (ECB). Identical
//! plaintext blocks therefore produce identical ciphertext blocks; there is no
//! chaining and no IV.
//!
//! Encryption always appends padding: a partial final block is filled up to
//! 16 bytes with copies of the pad length, and a block-aligned input gets one
//! extra block of sixteen `0x10` bytes. Decryption checks and strips that
//! padding from the final block only.

use std::io::{ErrorKind, Read, Write};

use crate::block::{Block, BLOCK_SIZE};
use crate::cipher::Aes128;
use crate::error::{Error, Result};

const READ_CHUNK: usize = 8 * 1024;

/// Feeds plaintext in arbitrary pieces and writes ciphertext blocks as soon
/// as they are complete.
pub struct StreamEncryptor<'c, W: Write> {
    cipher: &'c Aes128,
    writer: W,
    buffer: Block,
    filled: usize,
    written: u64,
}

impl<'c, W: Write> StreamEncryptor<'c, W> {
    /// Starts a new stream writing ciphertext to `writer`.
    pub fn new(cipher: &'c Aes128, writer: W) -> Self {
        Self {
            cipher,
            writer,
            buffer: [0u8; BLOCK_SIZE],
            filled: 0,
            written: 0,
        }
    }

    /// Appends plaintext.
    pub fn update(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            let take = (BLOCK_SIZE - self.filled).min(data.len());
            self.buffer[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if self.filled == BLOCK_SIZE {
                self.emit()?;
            }
        }
        Ok(())
    }

    /// Pads and writes the final block. Returns the number of ciphertext
    /// bytes written over the whole stream.
    pub fn finish(mut self) -> Result<u64> {
        let pad = (BLOCK_SIZE - self.filled) as u8;
        self.buffer[self.filled..].fill(pad);
        self.emit()?;
        self.writer.flush()?;
        tracing::debug!(
            blocks = self.written / BLOCK_SIZE as u64,
            pad,
            "encrypted stream"
        );
        Ok(self.written)
    }

    fn emit(&mut self) -> Result<()> {
        let mut block = self.buffer;
        self.cipher.encrypt_block(&mut block);
        self.writer.write_all(&block)?;
        self.written += BLOCK_SIZE as u64;
        self.filled = 0;
        Ok(())
    }
}

/// Feeds ciphertext in arbitrary pieces and writes plaintext, holding back
/// the most recent decrypted block until it is known not to be the last one.
pub struct StreamDecryptor<'c, W: Write> {
    cipher: &'c Aes128,
    writer: W,
    pending: Block,
    filled: usize,
    held: Option<Block>,
    received: u64,
    written: u64,
}

impl<'c, W: Write> StreamDecryptor<'c, W> {
    /// Starts a new stream writing plaintext to `writer`.
    pub fn new(cipher: &'c Aes128, writer: W) -> Self {
        Self {
            cipher,
            writer,
            pending: [0u8; BLOCK_SIZE],
            filled: 0,
            held: None,
            received: 0,
            written: 0,
        }
    }

    /// Appends ciphertext.
    pub fn update(&mut self, mut data: &[u8]) -> Result<()> {
        self.received += data.len() as u64;
        while !data.is_empty() {
            let take = (BLOCK_SIZE - self.filled).min(data.len());
            self.pending[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if self.filled == BLOCK_SIZE {
                self.accept_block()?;
            }
        }
        Ok(())
    }

    /// Validates and strips the padding of the final block, then writes what
    /// remains of it. Returns the number of plaintext bytes written over the
    /// whole stream.
    pub fn finish(mut self) -> Result<u64> {
        let last = match self.held.take() {
            Some(block) if self.filled == 0 => block,
            _ => {
                return Err(Error::TruncatedStream {
                    len: self.received,
                })
            }
        };
        let keep = unpadded_len(&last)?;
        self.writer.write_all(&last[..keep])?;
        self.written += keep as u64;
        self.writer.flush()?;
        tracing::debug!(
            blocks = self.received / BLOCK_SIZE as u64,
            plaintext_bytes = self.written,
            "decrypted stream"
        );
        Ok(self.written)
    }

    fn accept_block(&mut self) -> Result<()> {
        if let Some(previous) = self.held.take() {
            self.writer.write_all(&previous)?;
            self.written += BLOCK_SIZE as u64;
        }
        let mut block = self.pending;
        self.cipher.decrypt_block(&mut block);
        self.held = Some(block);
        self.filled = 0;
        Ok(())
    }
}

/// Number of leading bytes of `block` that are plaintext, after checking
/// that it ends in well-formed PKCS#7 padding.
fn unpadded_len(block: &Block) -> Result<usize> {
    let value = block[BLOCK_SIZE - 1];
    let pad = usize::from(value);
    if pad == 0 || pad > BLOCK_SIZE {
        return Err(Error::Padding { value });
    }
    if block[BLOCK_SIZE - pad..].iter().any(|&b| b != value) {
        return Err(Error::Padding { value });
    }
    Ok(BLOCK_SIZE - pad)
}

/// Encrypts `plaintext` into a new buffer.
pub fn encrypt_stream(plaintext: &[u8], cipher: &Aes128) -> Vec<u8> {
    let mut out = Vec::with_capacity((plaintext.len() / BLOCK_SIZE + 1) * BLOCK_SIZE);
    for chunk in plaintext.chunks_exact(BLOCK_SIZE) {
        let mut block: Block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        cipher.encrypt_block(&mut block);
        out.extend_from_slice(&block);
    }

    let tail = plaintext.chunks_exact(BLOCK_SIZE).remainder();
    let pad = (BLOCK_SIZE - tail.len()) as u8;
    let mut last = [pad; BLOCK_SIZE];
    last[..tail.len()].copy_from_slice(tail);
    cipher.encrypt_block(&mut last);
    out.extend_from_slice(&last);
    out
}

/// Decrypts `ciphertext` into a new buffer, validating and removing padding.
pub fn decrypt_stream(ciphertext: &[u8], cipher: &Aes128) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::TruncatedStream {
            len: ciphertext.len() as u64,
        });
    }

    let mut out = Vec::with_capacity(ciphertext.len());
    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut block: Block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        out.extend_from_slice(&block);
    }

    let last_start = out.len() - BLOCK_SIZE;
    let mut last: Block = [0u8; BLOCK_SIZE];
    last.copy_from_slice(&out[last_start..]);
    let keep = unpadded_len(&last)?;
    out.truncate(last_start + keep);
    Ok(out)
}

/// Encrypts everything `reader` yields into `writer`. Returns the number of
/// ciphertext bytes written.
pub fn encrypt_reader<R: Read, W: Write>(reader: R, writer: W, cipher: &Aes128) -> Result<u64> {
    let mut encryptor = StreamEncryptor::new(cipher, writer);
    pump(reader, |chunk| encryptor.update(chunk))?;
    encryptor.finish()
}

/// Decrypts everything `reader` yields into `writer`. Returns the number of
/// plaintext bytes written.
pub fn decrypt_reader<R: Read, W: Write>(reader: R, writer: W, cipher: &Aes128) -> Result<u64> {
    let mut decryptor = StreamDecryptor::new(cipher, writer);
    pump(reader, |chunk| decryptor.update(chunk))?;
    decryptor.finish()
}

fn pump<R: Read>(mut reader: R, mut sink: impl FnMut(&[u8]) -> Result<()>) -> Result<()> {
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => sink(&buf[..n])?,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}
