//! Command-line interface for file encryption with AES-128.

#![forbid(unsafe_code)]

mod hexfile;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use aes_core::{Aes128, Aes128Key};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

const SAMPLE_TEXT: &str = "This is a test input for AES encryption!";

/// AES-128 file encryption CLI.
#[derive(Parser)]
#[command(name = "aes128", version, author, about = "AES-128 file encryption (ECB, PKCS#7)")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a random 16-character printable key.
    Keygen {
        /// Optional RNG seed for reproducible keys.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Encrypt a file into space-separated hex text.
    Enc {
        #[command(flatten)]
        key: KeyArgs,
        /// Plaintext input file.
        #[arg(long, value_name = "FILE", default_value = "input.txt")]
        input: PathBuf,
        /// Hex ciphertext output file.
        #[arg(long, value_name = "FILE", default_value = "encrypteddata.txt")]
        output: PathBuf,
    },
    /// Decrypt hex text produced by `enc`.
    Dec {
        #[command(flatten)]
        key: KeyArgs,
        /// Hex ciphertext input file.
        #[arg(long, value_name = "FILE", default_value = "encrypteddata.txt")]
        input: PathBuf,
        /// Plaintext output file.
        #[arg(long, value_name = "FILE", default_value = "decrypteddata.txt")]
        output: PathBuf,
    },
    /// Run a local demo: generate a key, encrypt a sample text, decrypt it back.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Key sources; prompts on stdin when neither is given.
#[derive(Args)]
struct KeyArgs {
    /// Key as exactly 16 characters.
    #[arg(long, value_name = "TEXT", conflicts_with = "key_hex")]
    key: Option<String>,
    /// Key as 32 hex characters.
    #[arg(long, value_name = "HEX")]
    key_hex: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Keygen { seed } => cmd_keygen(seed),
        Commands::Enc { key, input, output } => cmd_enc(&key, &input, &output),
        Commands::Dec { key, input, output } => cmd_dec(&key, &input, &output),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_keygen(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let key = Aes128Key::generate_printable(&mut rng);
    println!("{}", key_text(&key));
    tracing::info!("generated printable key");
    Ok(())
}

fn cmd_enc(key: &KeyArgs, input: &PathBuf, output: &PathBuf) -> Result<()> {
    let cipher = Aes128::new(resolve_key(key)?);
    let written = hexfile::encrypt_file(input, output, &cipher)?;
    tracing::info!(blocks = written / 16, "encryption complete");
    println!("Encryption complete. Data written to {}", output.display());
    Ok(())
}

fn cmd_dec(key: &KeyArgs, input: &PathBuf, output: &PathBuf) -> Result<()> {
    let cipher = Aes128::new(resolve_key(key)?);
    let written = hexfile::decrypt_file(input, output, &cipher)?;
    tracing::info!(bytes = written, "decryption complete");
    println!("Decryption complete. Data written to {}", output.display());
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let cipher = Aes128::generate(&mut rng);

    let mut ciphertext = Vec::new();
    hexfile::encrypt_hex(SAMPLE_TEXT.as_bytes(), &mut ciphertext, &cipher)?;
    let mut decrypted = Vec::new();
    hexfile::decrypt_hex(ciphertext.as_slice(), &mut decrypted, &cipher)?;

    println!("demo key: {}", key_text(cipher.key()));
    println!("plaintext: {SAMPLE_TEXT}");
    println!("ciphertext: {}", String::from_utf8_lossy(&ciphertext).trim_end());
    println!("decrypted: {}", String::from_utf8_lossy(&decrypted));
    if decrypted != SAMPLE_TEXT.as_bytes() {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn resolve_key(args: &KeyArgs) -> Result<Aes128Key> {
    match (&args.key, &args.key_hex) {
        (Some(text), _) => parse_key_text(text),
        (None, Some(hex_str)) => parse_key_hex(hex_str),
        (None, None) => prompt_key(io::stdin().lock(), io::stdout()),
    }
}

fn parse_key_text(text: &str) -> Result<Aes128Key> {
    Aes128Key::from_text(text).context("key must be exactly 16 characters")
}

fn parse_key_hex(hex_str: &str) -> Result<Aes128Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    Aes128Key::try_from(bytes.as_slice()).context("key must be 32 hex characters")
}

fn prompt_key<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Aes128Key> {
    write!(output, "Enter key (16 characters): ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("read key")? == 0 {
        bail!("no key entered");
    }
    parse_key_text(line.trim_end_matches(['\r', '\n']))
}

/// Printable keys are shown as typed; anything else as hex.
fn key_text(key: &Aes128Key) -> String {
    match std::str::from_utf8(key.as_bytes()) {
        Ok(text) if key.as_bytes().iter().all(u8::is_ascii_graphic) => text.to_owned(),
        _ => hex::encode(key.as_bytes()),
    }
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
