//! Ciphertext at rest: space-separated two-digit hex bytes.
//!
//! Every ciphertext byte becomes two lowercase hex digits and a trailing
//! space, blocks back to back with no other separator. Reading splits on any
//! whitespace, so sixteen tokens make one block.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use aes_core::{encrypt_reader, Aes128, StreamDecryptor};
use anyhow::{bail, Context, Result};

/// Writes every byte it is given as `"xx "`.
pub struct HexWriter<W: Write> {
    inner: W,
}

impl<W: Write> HexWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for HexWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut text = Vec::with_capacity(buf.len() * 3);
        for &byte in buf {
            let mut pair = [0u8; 2];
            hex::encode_to_slice([byte], &mut pair)
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
            text.extend_from_slice(&pair);
            text.push(b' ');
        }
        self.inner.write_all(&text)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn parse_token(token: &[u8], position: usize) -> Result<u8> {
    let shown = String::from_utf8_lossy(token);
    if token.len() != 2 {
        bail!("token {position} ({shown:?}) is not a two-digit hex byte");
    }
    let mut byte = [0u8; 1];
    hex::decode_to_slice(token, &mut byte)
        .with_context(|| format!("token {position} ({shown:?}) is not a two-digit hex byte"))?;
    Ok(byte[0])
}

/// Encrypts `reader` and writes the ciphertext as hex text. Returns the
/// number of ciphertext bytes.
pub fn encrypt_hex<R: Read, W: Write>(reader: R, writer: W, cipher: &Aes128) -> Result<u64> {
    Ok(encrypt_reader(reader, HexWriter::new(writer), cipher)?)
}

/// Parses hex text from `reader` as it arrives and decrypts it. Returns the
/// number of plaintext bytes.
pub fn decrypt_hex<R: BufRead, W: Write>(reader: R, writer: W, cipher: &Aes128) -> Result<u64> {
    let mut decryptor = StreamDecryptor::new(cipher, writer);
    let mut position = 0usize;
    let mut bytes = Vec::new();
    for segment in reader.split(b' ') {
        let segment = segment.context("read ciphertext")?;
        bytes.clear();
        for token in segment
            .split(|b| b.is_ascii_whitespace())
            .filter(|token| !token.is_empty())
        {
            position += 1;
            bytes.push(parse_token(token, position)?);
        }
        decryptor.update(&bytes)?;
    }
    Ok(decryptor.finish()?)
}

/// Encrypts the file at `input` into hex text at `output`.
pub fn encrypt_file(input: &Path, output: &Path, cipher: &Aes128) -> Result<u64> {
    let reader = File::open(input).with_context(|| format!("open {}", input.display()))?;
    let writer = File::create(output).with_context(|| format!("create {}", output.display()))?;
    let written = encrypt_hex(BufReader::new(reader), BufWriter::new(writer), cipher)
        .with_context(|| format!("encrypt {}", input.display()))?;
    tracing::debug!(input = %input.display(), output = %output.display(), written, "encrypted file");
    Ok(written)
}

/// Decrypts hex text at `input` into `output`. On failure the partially
/// written output is removed.
pub fn decrypt_file(input: &Path, output: &Path, cipher: &Aes128) -> Result<u64> {
    let reader = File::open(input).with_context(|| format!("open {}", input.display()))?;
    let writer = File::create(output).with_context(|| format!("create {}", output.display()))?;
    match decrypt_hex(BufReader::new(reader), BufWriter::new(writer), cipher) {
        Ok(written) => {
            tracing::debug!(input = %input.display(), output = %output.display(), written, "decrypted file");
            Ok(written)
        }
        Err(err) => {
            if let Err(remove_err) = fs::remove_file(output) {
                tracing::warn!(output = %output.display(), %remove_err, "could not remove partial output");
            }
            Err(err.context(format!("decrypt {}", input.display())))
        }
    }
}
